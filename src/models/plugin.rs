use super::ConnectionParams;
use std::collections::BTreeMap;
use std::fmt;

/// Type identifier advertised for the engine element
pub const ENGINE_MIME_TYPE: &str = "application/x-mosh-engine";

/// Attributes that carry credentials and are removed once the engine loaded
pub const SENSITIVE_ATTRIBUTES: [&str; 2] = ["key", "ssh_key"];

/// Attribute set describing one engine instance.
///
/// Mirrors the element the engine is instantiated from: the attributes are
/// handed over once at insertion, and sensitive ones are erased afterwards.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PluginElement {
    attributes: BTreeMap<String, String>,
}

impl PluginElement {
    pub fn new(src: impl Into<String>) -> Self {
        let mut element = Self::default();
        element.set_attribute("src", src);
        element.set_attribute("type", ENGINE_MIME_TYPE);
        element
    }

    /// Build the element for a session.
    ///
    /// Takes the parameters by value; they are dropped when this returns, so
    /// the element is the only remaining copy.
    pub fn configure(src: impl Into<String>, params: ConnectionParams, ssh_key: Option<String>) -> Self {
        let mut element = Self::new(src);
        element.set_attribute("key", params.key);
        element.set_attribute("addr", params.addr);
        element.set_attribute("port", params.port);
        element.set_attribute("user", params.user);
        if let Some(mode) = params.mode {
            element.set_attribute("mode", mode.as_str());
        }
        if let Some(ssh_key) = ssh_key {
            element.set_attribute("ssh_key", ssh_key);
        }
        element
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn src(&self) -> Option<&str> {
        self.attribute("src")
    }

    /// Drop every credential-bearing attribute
    pub fn erase_sensitive(&mut self) -> usize {
        SENSITIVE_ATTRIBUTES
            .iter()
            .filter(|name| self.attributes.remove(**name).is_some())
            .count()
    }
}

impl fmt::Debug for PluginElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.attributes {
            if SENSITIVE_ATTRIBUTES.contains(&name.as_str()) {
                map.entry(name, &"<redacted>");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionMode;

    fn manual_params() -> ConnectionParams {
        ConnectionParams::new("host1", "2022", "alice", "id1", Some(ConnectionMode::Manual))
    }

    #[test]
    fn test_configure_sets_connection_attributes() {
        let element = PluginElement::configure("mosh-engine", manual_params(), None);

        assert_eq!(element.attribute("addr"), Some("host1"));
        assert_eq!(element.attribute("port"), Some("2022"));
        assert_eq!(element.attribute("user"), Some("alice"));
        assert_eq!(element.attribute("key"), Some("id1"));
        assert_eq!(element.attribute("mode"), Some("manual"));
        assert_eq!(element.src(), Some("mosh-engine"));
        assert_eq!(element.attribute("type"), Some(ENGINE_MIME_TYPE));
        assert!(!element.has_attribute("ssh_key"));
    }

    #[test]
    fn test_configure_without_mode_omits_attribute() {
        let params = ConnectionParams::new("h", "22", "u", "", None);
        let element = PluginElement::configure("e", params, None);
        assert!(!element.has_attribute("mode"));
        assert_eq!(element.attribute("key"), Some(""));
    }

    #[test]
    fn test_configure_with_ssh_key() {
        let element = PluginElement::configure("e", manual_params(), Some("PEM".to_string()));
        assert_eq!(element.attribute("ssh_key"), Some("PEM"));
    }

    #[test]
    fn test_erase_sensitive() {
        let mut element = PluginElement::configure("e", manual_params(), Some("PEM".to_string()));
        assert_eq!(element.erase_sensitive(), 2);
        assert!(!element.has_attribute("key"));
        assert!(!element.has_attribute("ssh_key"));
        assert_eq!(element.attribute("addr"), Some("host1"));
        assert_eq!(element.erase_sensitive(), 0);
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let element = PluginElement::configure("e", manual_params(), Some("PEM".to_string()));
        let dbg = format!("{:?}", element);
        assert!(!dbg.contains("id1"));
        assert!(!dbg.contains("PEM"));
        assert!(dbg.contains("host1"));
    }
}
