use crate::models::{ConnectionMode, ConnectionParams};

/// One option of the mode radio group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioOption {
    pub mode: ConnectionMode,
    pub checked: bool,
}

impl RadioOption {
    /// Element id the option is known by in the setup form
    pub fn id(&self) -> &'static str {
        match self.mode {
            ConnectionMode::Ssh => "ssh-mode",
            ConnectionMode::Manual => "manual-mode",
        }
    }
}

/// Setup form state: field values plus row visibility.
///
/// Nothing here is validated; whatever the user typed is forwarded as-is.
#[derive(Debug, Clone)]
pub struct ConnectionForm {
    pub addr: String,
    pub port: String,
    pub user: String,
    pub key: String,
    /// Mode radio group, ssh-mode first
    pub mode_options: Vec<RadioOption>,
    pub username_row_hidden: bool,
    pub key_row_hidden: bool,
}

impl Default for ConnectionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionForm {
    /// Create the form as it first appears, ssh-mode checked
    pub fn new() -> Self {
        Self::with_mode(ConnectionMode::default())
    }

    pub fn with_mode(mode: ConnectionMode) -> Self {
        let mut form = Self {
            addr: String::new(),
            port: String::new(),
            user: String::new(),
            key: String::new(),
            mode_options: ConnectionMode::ALL
                .iter()
                .map(|m| RadioOption {
                    mode: *m,
                    checked: *m == mode,
                })
                .collect(),
            username_row_hidden: false,
            key_row_hidden: true,
        };
        form.on_mode_change();
        form
    }

    /// Refresh port default and row visibility from the mode radio group
    pub fn on_mode_change(&mut self) {
        let ssh_checked = self
            .mode_options
            .iter()
            .any(|o| o.mode == ConnectionMode::Ssh && o.checked);

        let shown = if ssh_checked {
            ConnectionMode::Ssh
        } else {
            ConnectionMode::Manual
        };
        self.port = shown.default_port().to_string();
        self.username_row_hidden = !shown.shows_username();
        self.key_row_hidden = !shown.shows_key();
    }

    /// Check one mode option and uncheck the rest
    pub fn select_mode(&mut self, mode: ConnectionMode) {
        for option in &mut self.mode_options {
            option.checked = option.mode == mode;
        }
        self.on_mode_change();
    }

    /// First checked mode option, if any
    pub fn selected_mode(&self) -> Option<ConnectionMode> {
        self.mode_options.iter().find(|o| o.checked).map(|o| o.mode)
    }

    /// Update a text field by its form name
    pub fn update_field(&mut self, field: &str, value: String) {
        match field {
            "addr" => self.addr = value,
            "port" => self.port = value,
            "user" => self.user = value,
            "key" => self.key = value,
            _ => tracing::warn!("Unknown form field: {}", field),
        }
    }

    /// Snapshot the form into connection parameters
    pub fn collect_params(&self) -> ConnectionParams {
        ConnectionParams::new(
            self.addr.clone(),
            self.port.clone(),
            self.user.clone(),
            self.key.clone(),
            self.selected_mode(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_form_is_ssh_mode() {
        let form = ConnectionForm::new();
        assert_eq!(form.selected_mode(), Some(ConnectionMode::Ssh));
        assert_eq!(form.port, "22");
        assert!(!form.username_row_hidden);
        assert!(form.key_row_hidden);
    }

    #[test]
    fn test_select_manual_mode() {
        let mut form = ConnectionForm::new();
        form.select_mode(ConnectionMode::Manual);

        assert_eq!(form.selected_mode(), Some(ConnectionMode::Manual));
        assert_eq!(form.port, "60001");
        assert!(form.username_row_hidden);
        assert!(!form.key_row_hidden);
        assert_eq!(form.mode_options.iter().filter(|o| o.checked).count(), 1);
    }

    #[test]
    fn test_mode_change_overwrites_port() {
        let mut form = ConnectionForm::new();
        form.update_field("port", "2222".to_string());
        form.select_mode(ConnectionMode::Manual);
        assert_eq!(form.port, "60001");
        form.select_mode(ConnectionMode::Ssh);
        assert_eq!(form.port, "22");
    }

    #[test]
    fn test_first_checked_option_wins() {
        let mut form = ConnectionForm::new();
        for option in &mut form.mode_options {
            option.checked = true;
        }
        assert_eq!(form.selected_mode(), Some(ConnectionMode::Ssh));

        form.mode_options.reverse();
        assert_eq!(form.selected_mode(), Some(ConnectionMode::Manual));
    }

    #[test]
    fn test_nothing_checked() {
        let mut form = ConnectionForm::new();
        for option in &mut form.mode_options {
            option.checked = false;
        }
        form.on_mode_change();

        assert_eq!(form.selected_mode(), None);
        assert_eq!(form.port, "60001");
        assert!(form.collect_params().mode.is_none());
    }

    #[test]
    fn test_collect_params_verbatim() {
        let mut form = ConnectionForm::with_mode(ConnectionMode::Manual);
        form.update_field("addr", " host1 ".to_string());
        form.update_field("port", "2022".to_string());
        form.update_field("user", "alice".to_string());
        form.update_field("key", "id1".to_string());
        form.update_field("bogus", "ignored".to_string());

        let params = form.collect_params();
        assert_eq!(params.addr, " host1 ");
        assert_eq!(params.port, "2022");
        assert_eq!(params.user, "alice");
        assert_eq!(params.key, "id1");
        assert_eq!(params.mode, Some(ConnectionMode::Manual));
    }

    #[test]
    fn test_option_ids() {
        let form = ConnectionForm::new();
        let ids: Vec<_> = form.mode_options.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec!["ssh-mode", "manual-mode"]);
    }
}
