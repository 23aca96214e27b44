pub mod documents;
pub mod keys;
pub mod properties;
pub mod storage_class;

pub use documents::{COMMON_VARS_FILENAME, ConfigDocument, METADATA_FILENAME, Metadata, render_list};
pub use keys::BlobKey;
pub use properties::{ENV_PROPERTIES_FILENAME, Properties};
pub use storage_class::StorageClass;
