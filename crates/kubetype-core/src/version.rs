//! Version and group tokens derived from `apiVersion`
//!
//! | apiVersion                      | version token | group prefix        |
//! |---------------------------------|---------------|---------------------|
//! | `v1`                            | `V1`          | (none)              |
//! | `apps/v1`                       | `V1`          | (none)              |
//! | `policy/v1beta1`                | `V1beta1`     | (none)              |
//! | `networking.k8s.io/v1`          | `V1`          | `Networking`        |
//! | `rbac.authorization.k8s.io/v1`  | `V1`          | `RbacAuthorization` |

use crate::naming::capitalize;

/// Number of trailing group components that form the domain suffix (`k8s.io`)
const DOMAIN_SUFFIX_COMPONENTS: usize = 2;

/// Capitalized version segment of an apiVersion
pub fn version_token(api_version: &str) -> String {
    match api_version.rsplit_once('/') {
        Some((_, version)) => capitalize(version),
        None => capitalize(api_version),
    }
}

/// Capitalized API group components, minus the domain suffix
///
/// Empty when the group has no more components than the domain suffix.
pub fn group_prefix(api_version: &str) -> String {
    let group = api_version.split('/').next().unwrap_or_default();
    let components: Vec<&str> = group.split('.').collect();

    if components.len() <= DOMAIN_SUFFIX_COMPONENTS {
        return String::new();
    }

    components[..components.len() - DOMAIN_SUFFIX_COMPONENTS]
        .iter()
        .map(|c| capitalize(c))
        .collect()
}
