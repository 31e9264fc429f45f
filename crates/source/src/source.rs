use crate::document::Document;
use crate::error::SourceError;
use crate::id::DocumentId;
use rayon::prelude::*;

/// Where documents come from.
///
/// Implementations are selected once from configuration
/// ([`crate::SourceConfig::build`]); callers only see this trait.
pub trait DocumentSource: Send + Sync {
    /// Resolves one document. `Ok(None)` means not found, including any
    /// upstream failure of a remote store.
    fn resolve(&self, id: &DocumentId) -> Result<Option<Document>, SourceError>;

    /// Lists every document identifier. `Ok(None)` means the listing is
    /// currently unavailable, which callers should treat as an empty index.
    fn list(&self) -> Result<Option<Vec<DocumentId>>, SourceError>;

    /// Resolves every listed document in parallel.
    ///
    /// Documents that fail to resolve are logged and left out; one failure
    /// never aborts the batch. Order follows [`DocumentSource::list`].
    fn load_all(&self) -> Result<Option<Vec<Document>>, SourceError> {
        let Some(ids) = self.list()? else {
            return Ok(None);
        };
        let documents = ids
            .par_iter()
            .filter_map(|id| match self.resolve(id) {
                Ok(Some(doc)) => Some(doc),
                Ok(None) => {
                    log::warn!("Listed document {id} could not be resolved");
                    None
                }
                Err(err) => {
                    log::warn!("Skipping document {id}: {err}");
                    None
                }
            })
            .collect();
        Ok(Some(documents))
    }
}
