//! Asset layer: raw byte sources and the typed, cached repository on top.
//!
//! ```text
//! ┌──────────────────────┐    ┌───────────────────────────┐
//! │  AssetSource         │    │  AssetRepository          │
//! │  (fs, in-memory)     │───▶│  .rec → record (msgpack)  │
//! └──────────────────────┘    │  .json → document         │
//!                             └───────────────────────────┘
//! ```

pub mod records;
pub mod repository;
pub mod source;

pub use records::{
    ChapterRecord, ClassroomIdList, ClassroomRecord, StoryRecord, TopicRecord, encode_record,
};
pub use repository::{AssetRepository, DOCUMENT_EXTENSION, RECORD_EXTENSION};
pub use source::{AssetSource, FsAssetSource, InMemoryAssetSource};
