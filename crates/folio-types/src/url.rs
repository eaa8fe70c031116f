//! Identity to URL mapping.

use crate::error::TypeError;
use crate::identity::{ObjectRef, RefKind};

/// Path prefix under which package pages are served.
pub const DEFAULT_PATH_PREFIX: &str = "/p/";

/// Map an identity to the URL of its rendered page.
///
/// - No package: the bare path (a same-page reference).
/// - `examples`: `{prefix}{package}/{version}/examples/{path}`
/// - `module`, `api`, `assets`, `?`: `{prefix}{package}/{version}/api/{path}`
///
/// Narrative `docs` pages are not addressable through this mapping.
///
/// ```
/// use folio_types::{to_url, ObjectRef, DEFAULT_PATH_PREFIX};
///
/// let r = ObjectRef::api("numpy", "1.22", "numpy.linalg.norm");
/// assert_eq!(to_url(&r, DEFAULT_PATH_PREFIX).unwrap(), "/p/numpy/1.22/api/numpy.linalg.norm");
/// ```
pub fn to_url(r: &ObjectRef, prefix: &str) -> Result<String, TypeError> {
    if r.kind == RefKind::Docs {
        return Err(TypeError::UnsupportedUrlKind(r.kind));
    }
    let Some(package) = &r.package else {
        return Ok(r.path.clone());
    };
    let version = r.version.as_ref().ok_or_else(|| TypeError::MissingVersion {
        path: r.path.clone(),
    })?;
    let section = match r.kind {
        RefKind::Examples => "examples",
        _ => "api",
    };
    Ok(format!("{prefix}{package}/{version}/{section}/{}", r.path))
}

impl ObjectRef {
    /// [`to_url`] with the given prefix.
    pub fn to_url(&self, prefix: &str) -> Result<String, TypeError> {
        to_url(self, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn examples_get_their_own_section() {
        let r = ObjectRef::new("scipy", "1.8", RefKind::Examples, "plot_fft.py");
        assert_eq!(to_url(&r, "/p/").unwrap(), "/p/scipy/1.8/examples/plot_fft.py");
    }

    #[test]
    fn modules_and_unknowns_use_api_section() {
        let m = ObjectRef::module("scipy", "1.8", "scipy.fft");
        assert_eq!(to_url(&m, "/p/").unwrap(), "/p/scipy/1.8/api/scipy.fft");
        let u = ObjectRef::new("?", "?", RefKind::Unknown, "scipy.fft.X");
        assert_eq!(to_url(&u, "/p/").unwrap(), "/p/?/?/api/scipy.fft.X");
    }

    #[test]
    fn custom_prefix() {
        let m = ObjectRef::module("scipy", "1.8", "scipy");
        assert_eq!(m.to_url("../").unwrap(), "../scipy/1.8/api/scipy");
    }

    #[test]
    fn local_refs_map_to_bare_path() {
        let r = ObjectRef::local(RefKind::Api, "#parameters");
        assert_eq!(to_url(&r, "/p/").unwrap(), "#parameters");
    }

    #[test]
    fn docs_kind_is_rejected() {
        let r = ObjectRef::new("pkg", "1.0", RefKind::Docs, "intro");
        assert_eq!(
            to_url(&r, "/p/"),
            Err(TypeError::UnsupportedUrlKind(RefKind::Docs))
        );
    }

    #[test]
    fn package_without_version_is_rejected() {
        let r = ObjectRef {
            package: Some("pkg".into()),
            version: None,
            kind: RefKind::Api,
            path: "pkg.f".into(),
        };
        assert!(matches!(to_url(&r, "/p/"), Err(TypeError::MissingVersion { .. })));
    }

    proptest! {
        #[test]
        fn api_url_contains_components_in_order(
            package in "[a-z][a-z0-9_]{0,8}",
            version in "[0-9]{1,2}(\\.[0-9]{1,2}){0,2}",
            path in "[a-z_]{1,6}(\\.[a-zA-Z_]{1,6}){0,4}",
        ) {
            let url = to_url(&ObjectRef::api(&package, &version, &path), DEFAULT_PATH_PREFIX).unwrap();
            let p = url.find(&package).unwrap();
            let v = p + package.len() + url[p + package.len()..].find(&version).unwrap();
            let q = v + version.len() + url[v + version.len()..].find(&path).unwrap();
            prop_assert!(p < v && v < q);
        }
    }
}
