use std::fmt::{Formatter, Display, Result as FmtResult};
use std::default::Default;

use chrono::{DateTime, Utc, Local, SecondsFormat};
use clap::{Args, ValueEnum};
use sekai_lib::assets::FileKind;

use crate::browser::ListingController;

#[derive(Debug)]
pub struct SizeType<T = u64> {
    pub value: T,
    pub unit: &'static str,
}

pub const KIBI: u64 = 1024;
pub const MEBI: u64 = KIBI * 1024;
pub const GIBI: u64 = MEBI * 1024;
pub const TEBI: u64 = GIBI * 1024;

pub const BASE_2_SIZE: [SizeType; 4] = [
    SizeType {
        value: TEBI,
        unit: "Ti",
    },
    SizeType {
        value: GIBI,
        unit: "Gi",
    },
    SizeType {
        value: MEBI,
        unit: "Mi",
    },
    SizeType {
        value: KIBI,
        unit: "Ki",
    },
];

pub const KILO: u64 = 1000;
pub const MEGA: u64 = KILO * 1000;
pub const GIGA: u64 = MEGA * 1000;
pub const TERA: u64 = GIGA * 1000;

pub const BASE_10_SIZE: [SizeType; 4] = [
    SizeType {
        value: TERA,
        unit: "T",
    },
    SizeType {
        value: GIGA,
        unit: "G",
    },
    SizeType {
        value: MEGA,
        unit: "M",
    },
    SizeType {
        value: KILO,
        unit: "K",
    },
];

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum BaseSize {
    #[default]
    Base2,
    Base10,
    Raw,
}

impl Display for BaseSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BaseSize::Base2 => write!(f, "base2"),
            BaseSize::Base10 => write!(f, "base10"),
            BaseSize::Raw => write!(f, "raw"),
        }
    }
}

pub fn value_to_unit(size: u64, base: &BaseSize, suffix: &str) -> String {
    let list = match base {
        BaseSize::Base2 => BASE_2_SIZE,
        BaseSize::Base10 => BASE_10_SIZE,
        BaseSize::Raw => {
            return format!("{size}{suffix}");
        }
    };

    for base in list {
        if size >= base.value {
            let output_size = size / base.value;

            if size % base.value == 0 {
                return format!("{output_size}{}{suffix}", base.unit);
            } else {
                return format!("~{output_size}{}{suffix}", base.unit);
            }
        }
    }

    format!("{size}{suffix}")
}

pub fn bytes_to_unit(size: u64, base: &BaseSize) -> String {
    value_to_unit(size, base, "B")
}

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum DateFormat {
    #[default]
    Local,
    Utc,
    Unix
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DateFormat::Local => write!(f, "local"),
            DateFormat::Utc => write!(f, "utc"),
            DateFormat::Unix => write!(f, "unix"),
        }
    }
}

pub fn datetime_to_string(dt: &DateTime<Utc>, format: &DateFormat) -> String {
    match format {
        DateFormat::Local => {
            DateTime::<Local>::from(*dt).to_rfc3339_opts(SecondsFormat::Secs, false)
        },
        DateFormat::Utc => {
            dt.to_rfc3339_opts(SecondsFormat::Secs, false)
        },
        DateFormat::Unix => {
            dt.timestamp().to_string()
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct OutputOptions {
    /// specifies the format for the file size output
    #[arg(long, default_value_t)]
    pub size_format: BaseSize,

    /// specifies the format for the timestamp output
    #[arg(long, default_value_t)]
    pub date_format: DateFormat,
}

pub enum Float {
    Left,
    Right,
}

pub struct Column {
    name: &'static str,
    width: usize,
    float: Float,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Column {
            name,
            width: name.len(),
            float: Float::Left,
        }
    }

    pub fn right(name: &'static str) -> Self {
        Column {
            name,
            width: name.len(),
            float: Float::Right,
        }
    }

    fn write_value<O>(&self, value: &str, output: &mut O) -> std::io::Result<()>
    where
        O: std::io::Write,
    {
        match self.float {
            Float::Left => write!(output, "{value:<width$}", width = self.width),
            Float::Right => write!(output, "{value:>width$}", width = self.width),
        }
    }
}

/// a table of text cells with an index column. column widths grow to fit
/// the widest value.
pub struct TextTable<const N: usize> {
    columns: [Column; N],
    rows: Vec<[String; N]>,
}

impl<const N: usize> TextTable<N> {
    pub fn with_columns(columns: [Column; N]) -> Self {
        TextTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: [String; N]) {
        for (value, col) in row.iter().zip(&mut self.columns) {
            let chars_count = value.chars().count();

            if chars_count > col.width {
                col.width = chars_count;
            }
        }

        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// writes nothing when there are no rows
    pub fn write<O>(&self, output: &mut O) -> std::io::Result<()>
    where
        O: std::io::Write
    {
        if self.rows.is_empty() {
            return Ok(());
        }

        let col_sep = " | ";
        let index_width = (self.rows.len().ilog10() + 2) as usize;

        write!(output, "{:index_width$}", "")?;

        for col in &self.columns {
            write!(output, "{col_sep}")?;
            col.write_value(col.name, output)?;
        }

        write!(output, "\n{}", "-".repeat(index_width))?;

        for col in &self.columns {
            write!(output, "-+-{}", "-".repeat(col.width))?;
        }

        writeln!(output)?;

        for (index, row) in self.rows.iter().enumerate() {
            write!(output, "{:>index_width$}", index + 1)?;

            for (col, value) in self.columns.iter().zip(row) {
                write!(output, "{col_sep}")?;
                col.write_value(value, output)?;
            }

            writeln!(output)?;
        }

        Ok(())
    }
}

pub fn write_breadcrumbs<O>(output: &mut O, controller: &ListingController) -> std::io::Result<()>
where
    O: std::io::Write
{
    let crumbs = controller.path().breadcrumbs();
    let mut first = true;

    for crumb in crumbs {
        if !first {
            write!(output, " > ")?;
        }

        first = false;

        let name = crumb.name.as_deref().unwrap_or("asset_viewer");

        if crumb.current {
            write!(output, "[{name}]")?;
        } else {
            write!(output, "{name}")?;
        }
    }

    writeln!(output)
}

/// breadcrumbs, then the parent entry, folders and files in the order they
/// were loaded
pub fn write_listing<O>(
    output: &mut O,
    controller: &ListingController,
    options: &OutputOptions,
) -> std::io::Result<()>
where
    O: std::io::Write
{
    write_breadcrumbs(output, controller)?;

    let mut table = TextTable::with_columns([
        Column::left("type"),
        Column::left("name"),
        Column::right("size"),
        Column::left("modified"),
    ]);

    if let Some(parent) = controller.path().parent() {
        table.add_row([
            "folder".into(),
            "..".into(),
            String::new(),
            parent.to_string(),
        ]);
    }

    for folder in controller.folders() {
        table.add_row([
            "folder".into(),
            format!("{}/", folder.name()),
            String::new(),
            String::new(),
        ]);
    }

    for file in controller.files() {
        let kind = FileKind::from_key(&file.key);

        table.add_row([
            kind.icon().into(),
            file.name().into(),
            bytes_to_unit(file.size, &options.size_format),
            datetime_to_string(&file.last_modified, &options.date_format),
        ]);
    }

    if table.is_empty() {
        writeln!(output, "empty folder")?;
    } else {
        table.write(output)?;
    }

    if controller.has_more() {
        writeln!(
            output,
            "... {} loaded, more entries available. use \"more\" or \"ls --all\"",
            plural_count(controller.pages_loaded(), "page", "pages"),
        )?;
    }

    Ok(())
}

/// writes a json value as an indented tree. nodes deeper than `depth`
/// are collapsed to their type and size.
pub fn write_json_tree<O>(output: &mut O, value: &serde_json::Value, depth: usize) -> std::io::Result<()>
where
    O: std::io::Write
{
    write_json_node(output, "root", value, depth, 0)
}

fn write_json_node<O>(
    output: &mut O,
    name: &str,
    value: &serde_json::Value,
    depth: usize,
    indent: usize,
) -> std::io::Result<()>
where
    O: std::io::Write
{
    let pad = "  ".repeat(indent);

    match value {
        serde_json::Value::Object(map) => {
            if depth == 0 || map.is_empty() {
                writeln!(output, "{pad}{name}: {{}} {} {}", map.len(), plural(map.len(), "key", "keys"))?;
            } else {
                writeln!(output, "{pad}{name}: {{")?;

                for (key, child) in map {
                    write_json_node(output, key, child, depth - 1, indent + 1)?;
                }

                writeln!(output, "{pad}}}")?;
            }
        }
        serde_json::Value::Array(list) => {
            if depth == 0 || list.is_empty() {
                writeln!(output, "{pad}{name}: [] {} {}", list.len(), plural(list.len(), "item", "items"))?;
            } else {
                writeln!(output, "{pad}{name}: [")?;

                for (index, child) in list.iter().enumerate() {
                    write_json_node(output, &index.to_string(), child, depth - 1, indent + 1)?;
                }

                writeln!(output, "{pad}]")?;
            }
        }
        scalar => {
            writeln!(output, "{pad}{name}: {scalar}")?;
        }
    }

    Ok(())
}

fn plural_count(count: usize, one: &'static str, many: &'static str) -> String {
    format!("{count} {}", plural(count, one, many))
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
