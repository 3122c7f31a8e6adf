#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Query not found on any page: {0:?}")]
    NotFound(String),

    #[error("Page {0} is not in the document")]
    MissingPage(u32),

    #[error("No keywords given")]
    NoKeywords,
}
