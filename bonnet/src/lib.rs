//! Bonnet is a kinematics kernel for four-bar bonnet hinge linkages.
//!
//! From the spatial positions of the four joints, [`build_table`] sweeps the
//! input crank and samples the bonnet opening angle and the planar pose of
//! the mechanism over its whole travel.
//!
//! ```
//! use bonnet::{build_table, path_for, JointSet};
//!
//! let table = build_table(&JointSet::example());
//! let range = table.range();
//! assert!(range.max_bonnet_angle > 0.);
//! let pose = table.nearest_by_bonnet_angle(45.);
//! assert!(path_for(pose).starts_with("M "));
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
pub use crate::{geometry::*, joint::*, model::*, point::*, sync::*, table::*, vector::*};

#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod geometry;
mod joint;
mod model;
#[cfg(feature = "plot")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "plot")))]
pub mod plot;
mod point;
mod sync;
mod table;
pub mod trig;
mod vector;
