//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod profile_discovery_source;

#[cfg(test)]
pub use profile_discovery_source::MockProfileDiscoverySource;
pub use profile_discovery_source::{
    DiscoveryDocument, DiscoveryLink, PROFILE_PAGE_MEDIA_TYPE, PROFILE_PAGE_REL,
    ProfileDiscoveryError, ProfileDiscoverySource,
};
