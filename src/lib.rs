//! # lazygal
//!
//! Keeps a directory of photos and its derived images in sync. For every
//! source image it makes sure a scaled preview, a square thumbnail, an
//! optional small feed thumbnail and an EXIF sidecar exist, and it deletes
//! derivatives whose source is gone.
//!
//! # Pipeline
//!
//! ```text
//! scan ─→ partition ─→ per worker: rotate (optional) ─→ derivatives + sidecar
//!                                         │
//!                                       join
//!                                         │
//!                              reap orphans ─→ pad to full rows
//! ```
//!
//! The output directory is the cache: a derivative is produced only when its
//! file is missing, so a second run over an unchanged directory writes
//! nothing and reports itself unmodified.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`gallery`] | `Gallery` state, worker pool coordination, padding, JSON snapshot |
//! | [`scan`] | Lists the images of a directory in filename order |
//! | [`partition`] | Splits the record list into contiguous per-worker chunks |
//! | [`process`] | One worker's pass: previews, thumbnails, feed thumbnails, sidecars |
//! | [`reap`] | Deletes derivatives with no matching record |
//! | [`sidecar`] | `.exif` / `.noexif` files next to the previews |
//! | [`imaging`] | Decode, scale, crop, encode, orientation, EXIF reading |
//! | [`cache`] | Derivative paths, presence checks, per-run cache statistics |
//! | [`cancel`] | Cooperative cancellation token |
//! | [`config`] | `lazygal.toml` loading, merging and validation |
//! | [`naming`] | Extension allow-list, filename ordering, sidecar and placeholder names |
//! | [`types`] | `ImageRecord` and `Artifact` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Decode Once
//!
//! Decoding dominates the cost of a record. The header is probed first and
//! the pixels are decoded at most once, only when a missing derivative needs
//! them; the same buffer then feeds every derivative of that record.
//!
//! ## Ownership Instead of Locks
//!
//! Workers get disjoint `&mut` chunks of the record list and write only the
//! files named after their own records. The `modified` flag and the
//! diagnostic log come back as return values and are merged after the join,
//! so no state is shared between workers except the cancel token.
//!
//! ## Atomic Writes
//!
//! Every image is encoded into a temporary file in the destination directory
//! and renamed into place. An interrupted run leaves either the old file or
//! the new one, never a truncated image that would later count as cached.

pub mod cache;
pub mod cancel;
pub mod config;
pub mod gallery;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod partition;
pub mod process;
pub mod reap;
pub mod scan;
pub mod sidecar;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
