//! Star-field view of an exoplanet's neighbourhood.
//!
//! Catalog stars are placed in a Cartesian frame around a reference
//! exoplanet, coloured from their BP/RP photometry through a blackbody model,
//! and projected onto a pannable, zoomable 2D view.
//!
//! # Modules
//!
//! - [`coordinates`]: RA/Dec to Cartesian and planar separation
//! - [`photometry`]: colour index, blackbody colour and lightening
//! - [`projection`]: screen projection and star picking
//! - [`star_field`] and [`loader`]: catalog rows to stars, on a worker thread
//! - [`view`] and [`controller`]: view state and input handling
//! - [`render`] and [`snapshot`]: frame drawing and PNG export
//! - [`session`]: the state owned by the window loop

pub mod controller;
pub mod coordinates;
pub mod loader;
pub mod photometry;
pub mod projection;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod star_field;
pub mod view;

pub use controller::{InputEvent, Key, Outcome};
pub use coordinates::{to_cartesian, CoordinateError, SkyPoint};
pub use projection::{hit_test, project, ScreenPoint, Viewport};
pub use render::{FrameRenderer, RenderError, Scene};
pub use session::{Session, SessionConfig};
pub use star_field::{
    CatalogRow, CatalogSource, FetchError, ReferencePoint, Star, StarField, StarFieldParams,
    StarId,
};
pub use view::{ViewConfig, ViewState};
