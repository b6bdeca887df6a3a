//! Clip descriptor validation.
//!
//! Turns one untyped JSON batch entry into a [`ClipDescriptor`]:
//!
//! - **Header**: shape, `type`, media path or embedded timeline, checked up front
//! - **Metadata**: `name`, `ID`, `notes`, `markers`, checked when read
//! - **Timeline XML**: optional well-formedness check before any host call

pub mod fields;
mod timeline_xml;
mod types;

pub use timeline_xml::check_timeline_xml;
pub use types::{
    parse_descriptor, parse_marker, ClipDescriptor, ClipSource, ClipType, MarkerDescriptor,
    POINT_MARKER_DURATION, TIMELINE_XML_KEY,
};
