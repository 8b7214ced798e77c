//! Tests for NotificationCenterArgs loaded from configuration documents

use unified_notifications::backends::android::Importance;
use unified_notifications::backends::ios::AuthorizationOption;
use unified_notifications::{NotificationCenterArgs, NotificationPresentation};

#[test]
fn test_minimal_document_uses_defaults() -> anyhow::Result<()> {
    let args: NotificationCenterArgs = serde_json::from_str(r#"{ "android_channel_id": "news" }"#)?;

    assert_eq!(args.android_channel_id.as_deref(), Some("news"));
    assert_eq!(
        args.presentation_options,
        NotificationPresentation::BADGE | NotificationPresentation::SOUND
    );
    assert!(!args.ios_register_for_remote_notifications);
    assert_eq!(args.android_channel(), None);
    Ok(())
}

#[test]
fn test_full_document() -> anyhow::Result<()> {
    let args: NotificationCenterArgs = serde_json::from_str(
        r#"{
            "presentation_options": 9,
            "android_channel_id": "alerts",
            "android_channel_name": "Alerts",
            "ios_authorization_options": 68,
            "ios_register_for_remote_notifications": true
        }"#,
    )?;

    assert_eq!(
        args.presentation_options,
        NotificationPresentation::ALERT | NotificationPresentation::VIBRATE
    );
    assert_eq!(
        args.ios_authorization_options(),
        AuthorizationOption::ALERT | AuthorizationOption::PROVISIONAL
    );

    let channel = args.android_channel().expect("channel name configured");
    assert_eq!(channel.name, "Alerts");
    assert_eq!(channel.description, "");
    assert_eq!(channel.importance, Importance::High);
    assert!(channel.enable_vibration);
    assert!(!channel.can_show_badge);
    Ok(())
}

#[test]
fn test_args_serialize_back() -> anyhow::Result<()> {
    let args = NotificationCenterArgs::default().with_android_channel("c", "Channel", "Desc");
    let json = serde_json::to_value(&args)?;

    assert_eq!(json["presentation_options"], 6);
    assert_eq!(json["android_channel_id"], "c");
    assert_eq!(json["ios_authorization_options"], serde_json::Value::Null);

    let back: NotificationCenterArgs = serde_json::from_value(json)?;
    assert_eq!(back, args);
    Ok(())
}
