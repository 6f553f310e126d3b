//! Concrete layout engine adapters and their startup loaders

#[cfg(feature = "native-engine")]
pub mod native;
pub mod probe;
#[cfg(feature = "taffy-engine")]
pub mod taffy_adapter;

#[cfg(feature = "native-engine")]
pub use native::NativeAdapter;
pub use probe::{LayoutHook, ProbeAdapter, ProbeEntry, ProbeStyle};
#[cfg(feature = "taffy-engine")]
pub use taffy_adapter::TaffyAdapter;

use crate::adapter::{AdapterLoader, LayoutAdapter};
use crate::error::{BenchError, Result};

/// Identifier of the in-house flex solver adapter (adapter A)
pub const NATIVE: &str = "native";
/// Identifier of the Taffy adapter (adapter B)
pub const TAFFY: &str = "taffy";

/// Loaders for the built-in engines, in comparison order: native first, taffy second.
pub fn builtin_loaders() -> Vec<AdapterLoader> {
    vec![
        AdapterLoader::new(NATIVE, load_native),
        AdapterLoader::new(TAFFY, load_taffy),
    ]
}

/// Keep only the loaders named in `names`, preserving loader order.
///
/// An empty `names` keeps everything. Unknown names are a configuration error.
pub fn select_loaders(loaders: Vec<AdapterLoader>, names: &[String]) -> Result<Vec<AdapterLoader>> {
    if names.is_empty() {
        return Ok(loaders);
    }

    if let Some(unknown) = names
        .iter()
        .find(|name| !loaders.iter().any(|l| l.id().as_str() == name.as_str()))
    {
        return Err(BenchError::configuration(format!(
            "unknown engine '{}'",
            unknown
        )));
    }

    Ok(loaders
        .into_iter()
        .filter(|l| names.iter().any(|name| name == l.id().as_str()))
        .collect())
}

fn load_native() -> Result<Box<dyn LayoutAdapter>> {
    #[cfg(feature = "native-engine")]
    {
        Ok(Box::new(NativeAdapter::new()))
    }
    #[cfg(not(feature = "native-engine"))]
    {
        Err(BenchError::adapter_unavailable(
            NATIVE,
            "built without the `native-engine` feature",
        ))
    }
}

fn load_taffy() -> Result<Box<dyn LayoutAdapter>> {
    #[cfg(feature = "taffy-engine")]
    {
        Ok(Box::new(TaffyAdapter::new()))
    }
    #[cfg(not(feature = "taffy-engine"))]
    {
        Err(BenchError::adapter_unavailable(
            TAFFY,
            "built without the `taffy-engine` feature",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_is_native_then_taffy() {
        let ids: Vec<_> = builtin_loaders()
            .iter()
            .map(|l| l.id().to_string())
            .collect();
        assert_eq!(ids, vec![NATIVE, TAFFY]);
    }

    #[test]
    fn test_select_loaders() {
        let selected = select_loaders(builtin_loaders(), &["taffy".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id().as_str(), TAFFY);

        assert_eq!(select_loaders(builtin_loaders(), &[]).unwrap().len(), 2);
        assert!(select_loaders(builtin_loaders(), &["yoga".to_string()]).is_err());
    }

    #[cfg(all(feature = "native-engine", feature = "taffy-engine"))]
    #[test]
    fn test_builtin_loaders_succeed_with_default_features() {
        for loader in builtin_loaders() {
            let adapter = loader.load().unwrap();
            assert_eq!(adapter.id(), loader.id());
        }
    }
}
