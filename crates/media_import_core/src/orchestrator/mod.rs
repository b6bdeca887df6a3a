//! Batch import orchestration.
//!
//! Each descriptor in a batch goes through the same sequence, and its
//! outcome is recorded at its own index:
//!
//! ```text
//! BatchImporter
//!     ├── parse_descriptor          (shape, type, media source)
//!     ├── import_simple_clip        clip / still / audio
//!     │   or import_compound_clip   subclip / seq, via the staging bin
//!     └── populate_clip             markers, name, description, notes, keywords
//!             └── on failure: discard_clip
//! ```
//!
//! # Example
//!
//! ```ignore
//! use media_import_core::host::MemoryEditor;
//! use media_import_core::orchestrator::{BatchImporter, ImportContext};
//!
//! let importer = BatchImporter::new(ImportContext::new(".temp"));
//! let mut editor = MemoryEditor::new();
//! let outcome = importer.import_batch(&mut editor, &payload)?;
//! println!("{} of {} imported", outcome.succeeded(), outcome.len());
//! ```

mod batch;
mod bins;
mod compound;
mod errors;
mod populate;
mod rollback;
mod simple;
mod temp_file;
mod types;

pub use batch::BatchImporter;
pub use bins::{
    enter_staging_bin, find_or_create_staging_bin, restore_folder, save_current_folder,
    SavedFolder,
};
pub use compound::{import_compound_clip, CompoundStage};
pub use errors::{BatchError, BatchResult, ErrorKind, ImportError, ImportResult};
pub use populate::{
    populate_clip, set_keywords, COMMENTS_FIELD, DESCRIPTION_FIELD, KEYWORDS_FIELD,
};
pub use simple::import_simple_clip;
pub use temp_file::TempTimelineFile;
pub use types::{BatchOutcome, ImportContext, ItemOutcome};
