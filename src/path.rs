use std::path::{PathBuf, Path, Component};
use std::fs::Metadata;
use std::io::ErrorKind;

/// metadata of a local path, None when nothing exists there
pub fn metadata<P>(path: P) -> Result<Option<Metadata>, std::io::Error>
where
    P: AsRef<Path>
{
    match path.as_ref().metadata() {
        Ok(m) => Ok(Some(m)),
        Err(err) => match err.kind() {
            ErrorKind::NotFound => Ok(None),
            _ => Err(err)
        }
    }
}

/// joins a relative path onto base and collapses `.` and `..` without
/// touching the filesystem
pub fn normalize_from<B, P>(base: B, path: P) -> PathBuf
where
    B: AsRef<Path>,
    P: AsRef<Path>,
{
    let given = path.as_ref();
    let joined = if given.is_absolute() {
        given.to_owned()
    } else {
        base.as_ref().join(given)
    };

    let mut rtn = PathBuf::new();

    for comp in joined.components() {
        match comp {
            Component::Prefix(prefix) => {
                rtn.push(prefix.as_os_str());
            }
            Component::RootDir => {
                rtn.push(comp.as_os_str());
            }
            Component::ParentDir => {
                rtn.pop();
            }
            Component::Normal(c) => {
                rtn.push(c);
            }
            Component::CurDir => {}
        }
    }

    rtn
}
