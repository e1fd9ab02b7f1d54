//! Process-wide capture configuration.
//!
//! Kept in its own test binary: installing a config changes every error built
//! afterwards in the process.

use errchain::{CaptureConfig, ConfigError, Error, DEFAULT_MAX_STACK, MAX_STACK_ENV};

#[test]
fn test_installed_config_applies_to_new_errors_only() {
    assert_eq!(CaptureConfig::global(), CaptureConfig::default());

    let before = Error::new("built with the default");
    let before_len = before.callers().unwrap().len();
    assert!(before_len > 1);

    CaptureConfig::new(1).install();
    assert_eq!(CaptureConfig::global().max_stack, 1);

    let after = Error::new("built after install").wrap("wrapped after install");
    assert_eq!(before.callers().unwrap().len(), before_len);
    for node in after.chain() {
        assert!(node.callers().unwrap().len() <= 1);
    }

    CaptureConfig::new(0).install();
    assert!(Error::new("bare").callers().unwrap().is_empty());
    assert_eq!(before.callers().unwrap().len(), before_len);

    CaptureConfig::default().install();
    assert_eq!(CaptureConfig::global().max_stack, DEFAULT_MAX_STACK);
    assert_eq!(Error::new("restored").callers().unwrap().len(), before_len);

    std::env::set_var(MAX_STACK_ENV, "3");
    assert_eq!(CaptureConfig::from_env().unwrap().max_stack, 3);

    std::env::set_var(MAX_STACK_ENV, "lots");
    assert_eq!(
        CaptureConfig::from_env().unwrap_err(),
        ConfigError::InvalidMaxStack {
            value: "lots".to_string()
        }
    );

    std::env::remove_var(MAX_STACK_ENV);
    assert_eq!(CaptureConfig::from_env().unwrap(), CaptureConfig::default());
}
