use claimsync_config::ClaimSyncConfig;
use figment::Jail;

#[test]
fn external_overrides_fill_config_values() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        let overrides = vec![(
            "CLAIMSYNC_USER_API__SECRET".to_string(),
            "secret_from_external".to_string(),
        )];

        let config = ClaimSyncConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.user_api.secret, "secret_from_external");
        Ok(())
    });
}

#[test]
fn process_env_beats_external_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.set_env("CLAIMSYNC_USER_API__SECRET", "secret_from_env");
        let overrides = vec![(
            "CLAIMSYNC_USER_API__SECRET".to_string(),
            "secret_from_external".to_string(),
        )];

        let config = ClaimSyncConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.user_api.secret, "secret_from_env");
        Ok(())
    });
}

#[test]
fn unrelated_override_keys_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        let overrides = vec![("HOME".to_string(), "/nowhere".to_string())];

        let config = ClaimSyncConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert!(config.user_api.secret.is_empty());
        Ok(())
    });
}
