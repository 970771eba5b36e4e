//! Core data model: track records, discoveries, and the component inventory

pub mod component;
pub mod discovery;
pub mod track;

pub use component::{Component, ComponentStatus};
pub use discovery::{Discovery, Urgency};
pub use track::{
    Complexity, OverrideEntry, Patch, PatchStatus, QualityThreshold, Track, TrackStatus,
};
