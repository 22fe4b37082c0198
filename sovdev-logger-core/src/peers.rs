//! Peer service registry
//!
//! Callers name the systems they talk to with stable friendly constants
//! (`BRREG`, `PAYMENT_GATEWAY`); operators control the opaque system
//! identifiers (CMDB ids) those constants resolve to on the wire. The
//! mapping between the two is fixed at initialization and immutable after.
//!
//! The synthetic name `INTERNAL` is always available and resolves to the
//! service's own name; callers use it when an operation does not involve an
//! external peer.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashMap;
//! use sovdev_logger_core::peers::{create_peer_services, PeerRegistry, PeerServices};
//!
//! let peers = create_peer_services(HashMap::from([
//!     ("BRREG".to_string(), "SYS1234567".to_string()),
//! ]));
//! assert!(peers.contains("BRREG"));
//! assert!(peers.contains(PeerServices::INTERNAL));
//!
//! let registry = PeerRegistry::new(peers.mappings().clone(), "my-service");
//! assert_eq!(registry.resolve(Some("BRREG")), "SYS1234567");
//! assert_eq!(registry.resolve(Some("INTERNAL")), "my-service");
//! ```

use std::collections::HashMap;

/// Frozen view of peer service definitions
///
/// Created once by the caller via [`create_peer_services`] and handed to
/// `initialize`. Exposes the raw mapping for initialization and a
/// membership check for validating names at call sites. There is no
/// mutation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerServices {
    mappings: HashMap<String, String>,
}

impl PeerServices {
    /// Synthetic peer name resolving to the service's own name
    pub const INTERNAL: &'static str = "INTERNAL";

    /// The peer definitions as supplied by the caller
    ///
    /// `INTERNAL` is not part of the mapping; it is merged in during
    /// initialization.
    pub fn mappings(&self) -> &HashMap<String, String> {
        &self.mappings
    }

    /// Whether `name` is a known peer constant (including `INTERNAL`)
    pub fn contains(&self, name: &str) -> bool {
        name == Self::INTERNAL || self.mappings.contains_key(name)
    }
}

/// Create frozen peer service constants from friendly-name definitions
///
/// # Arguments
///
/// * `definitions` - Mapping from friendly peer name to system identifier
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use sovdev_logger_core::peers::create_peer_services;
///
/// let peers = create_peer_services(HashMap::from([
///     ("BRREG".to_string(), "SYS1234567".to_string()),
///     ("ALTINN".to_string(), "SYS1005678".to_string()),
/// ]));
/// assert_eq!(peers.mappings().len(), 2);
/// ```
pub fn create_peer_services(definitions: HashMap<String, String>) -> PeerServices {
    PeerServices {
        mappings: definitions,
    }
}

/// Resolver installed at initialization
///
/// Holds the caller's mapping merged with the service's own identity, and
/// performs the name-to-system-id resolution for every record.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    mappings: HashMap<String, String>,
    own_service_name: String,
}

impl PeerRegistry {
    /// Build the resolver for a service
    ///
    /// The `INTERNAL` name is handled by the resolver itself and does not
    /// need to appear in `mapping`.
    pub fn new(mapping: HashMap<String, String>, own_service_name: impl Into<String>) -> Self {
        Self {
            mappings: mapping,
            own_service_name: own_service_name.into(),
        }
    }

    /// Resolve a friendly peer name to the system identifier emitted on the wire
    ///
    /// - `None` and `"INTERNAL"` resolve to the service's own name.
    /// - Known names resolve through the mapping.
    /// - Unknown names pass through unchanged after a one-line warning on
    ///   stderr, so a typo degrades a label instead of dropping a record.
    pub fn resolve(&self, name: Option<&str>) -> String {
        let name = match name {
            None => return self.own_service_name.clone(),
            Some(n) => n,
        };

        if name == PeerServices::INTERNAL {
            return self.own_service_name.clone();
        }

        if let Some(system_id) = self.mappings.get(name) {
            return system_id.clone();
        }

        let mut known: Vec<&str> = self.mappings.keys().map(String::as_str).collect();
        known.sort_unstable();
        eprintln!(
            "Warning: Unknown peer service: {}. Available: {} or INTERNAL",
            name,
            known.join(", ")
        );
        name.to_string()
    }

    /// The service's own name, used as the resolution of `INTERNAL`
    pub fn own_service_name(&self) -> &str {
        &self.own_service_name
    }
}
