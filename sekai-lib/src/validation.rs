/// checks that the given mime essence is an image type.
///
/// only the top level type is inspected so `image/png`, `image/jpeg` and
/// any other image subtype are accepted.
pub fn is_image_mime<G>(given: G) -> bool
where
    G: AsRef<str>
{
    given.as_ref().starts_with("image/")
}
