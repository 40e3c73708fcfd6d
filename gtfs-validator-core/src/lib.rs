/*! Validation of [GTFS](https://gtfs.org/) feeds.

A GTFS feed is a collection of CSV files. This crate does not read them: it receives
untyped rows ([RawRow]) and reports every violation of the GTFS reference it finds as a [Notice].

To get started, see [FeedLoader].

## Two phases

Rows are first turned into typed entities, one file at a time. A row with invalid fields
produces notices and no entity. Entities are stored in a [FeedRepository], keyed by their
identity: the first occurrence of an identity is kept and the following ones are reported
as duplicates.

Once everything is loaded, [LoadedFeed::validate] runs the consistency checks spanning
several entities or files (stop times of a trip, trips of a block, parents of locations...).

## Collect all

Validation never stops at the first problem. Each row reports all of its invalid fields,
and each validator reports all of the entities it rejects.
Only misuses of the API, like an unknown file name, are returned as [Error].

## Exclusions

When a file is missing or cannot be read, the files depending on it are skipped
(see [DependencyTree] and [FeedLoader::exclude]) to avoid cascades of meaningless notices.
*/

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate serde_derive;

pub mod build;
pub mod enums;
pub mod error;
mod exclusion;
pub mod notice;
pub(crate) mod objects;
mod pipeline;
mod raw_row;
mod repository;
mod stops;
pub mod time_codec;
mod translations;
pub mod validators;


pub use build::{BuildResult, FieldValidator};
pub use enums::*;
pub use error::Error;
pub use exclusion::DependencyTree;
pub use notice::{Notice, NoticeContainer, Severity, NO_ID};
pub use objects::*;
pub use pipeline::{FeedLoader, LoadedFeed, ValidationConfig, ValidationReport};
pub use raw_row::{RawRow, RawValue};
pub use repository::{FeedRepository, InsertOutcome, Table};
pub use stops::{ChildLocation, Location, LocationBase};
pub use time_codec::{HhMmSsCodec, TimeCodec};
pub use translations::{TableName, Translation, TranslationBase};
