//! Startup fetches: the dataset plus the optional criteria document.
//!
//! Both requests are issued together. A failed criteria fetch degrades to
//! the built-in descriptions; a failed dataset fetch is reported.

use tracing::warn;

use rubricate_core::adapter::{load_dataset, Adapted};
use rubricate_core::error::LoadError;
use rubricate_core::traits::DatasetSource;

/// Everything a session needs from the outside world.
#[derive(Debug)]
pub struct SessionInputs {
    pub dataset: Result<Adapted, LoadError>,
    /// Rubric text, when a document was configured and could be fetched.
    pub criteria_doc: Option<String>,
}

/// Fetch the criteria document. Any failure yields `None`.
pub async fn fetch_criteria_doc(source: &dyn DatasetSource) -> Option<String> {
    match source.fetch().await {
        Ok(doc) if !doc.content.trim().is_empty() => Some(doc.content),
        Ok(_) => {
            warn!("criteria document {} is empty, using built-in descriptions", source.location());
            None
        }
        Err(e) => {
            warn!("could not fetch criteria document, using built-in descriptions: {e}");
            None
        }
    }
}

/// Load the dataset and, when given, the criteria document concurrently.
pub async fn load_inputs(
    dataset: &dyn DatasetSource,
    criteria_doc: Option<&dyn DatasetSource>,
) -> SessionInputs {
    let doc = async {
        match criteria_doc {
            Some(source) => fetch_criteria_doc(source).await,
            None => None,
        }
    };
    let (dataset, criteria_doc) = futures::join!(load_dataset(dataset), doc);
    SessionInputs {
        dataset,
        criteria_doc,
    }
}
