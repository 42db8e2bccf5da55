//! End-to-end encoding scenarios
//!
//! Notification in, frame bytes out, checked against the gateway layout.


use integration_harness::{PLAIN_TOKEN, WRAPPED_TOKEN, payload_of, payload_text};
use pushwire_payload::{Notification, PayloadBuilder};
use pushwire_protocol::{
    DeviceToken, EncodeError, Frame, FrameEncoder, HEADER_LEN, MAX_FRAME_SIZE,
    normalize_device_token,
};
use serde_json::json;

#[test]
fn test_simple_notification_frame() -> anyhow::Result<()> {
    let notification = Notification::new()
        .with_badge(5)
        .with_sound("my_sound.aiff")
        .with_alert("Hello!");

    let frame = FrameEncoder::new().encode(&notification, WRAPPED_TOKEN)?;
    let expected = r#"{"aps":{"alert":"Hello!","badge":5,"sound":"my_sound.aiff"}}"#;

    let mut bytes = vec![0u8, 0, 32];
    bytes.extend(hex::decode(PLAIN_TOKEN)?);
    bytes.extend([0u8, expected.len() as u8]);
    bytes.extend(expected.as_bytes());

    assert_eq!(frame.as_bytes(), bytes.as_slice());
    Ok(())
}

#[test]
fn test_default_sound_with_custom_property() -> anyhow::Result<()> {
    let notification = Notification::new()
        .with_badge(0)
        .with_default_sound()
        .with_custom_property("typ", 1);

    let frame = FrameEncoder::new().encode(&notification, PLAIN_TOKEN)?;
    assert_eq!(
        payload_text(&frame),
        r#"{"aps":{"badge":0,"sound":"1.aiff"},"typ":"1"}"#
    );
    Ok(())
}

#[test]
fn test_token_normalization() {
    assert_eq!(normalize_device_token("<abc123 def456>"), "abc123def456");

    let wrapped: DeviceToken = WRAPPED_TOKEN.parse().unwrap();
    let plain: DeviceToken = PLAIN_TOKEN.parse().unwrap();
    assert_eq!(wrapped, plain);
}

#[test]
fn test_notification_from_json() -> anyhow::Result<()> {
    let notification: Notification = serde_json::from_value(json!({
        "alert": "From JSON",
        "badge": 2,
        "sound": true,
        "custom_properties": { "acme": [1, 2], "id": "x" }
    }))?;

    let frame = FrameEncoder::new().encode(&notification, PLAIN_TOKEN)?;
    assert_eq!(
        payload_text(&frame),
        r#"{"aps":{"alert":"From JSON","badge":2,"sound":"1.aiff"},"acme":"[1,2]","id":"x"}"#
    );
    Ok(())
}

#[test]
fn test_oversized_alert_is_shortened() -> anyhow::Result<()> {
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(10);
    let notification = Notification::new()
        .with_alert(&text)
        .with_badge(12)
        .with_custom_property("thread", "conversation-4711".repeat(3));

    let frame = FrameEncoder::new().encode(&notification, WRAPPED_TOKEN)?;
    assert!(frame.len() <= MAX_FRAME_SIZE);

    let alert = payload_of(&frame).alert().unwrap().to_string();
    assert!(alert.ends_with("..."));
    assert!(text.starts_with(alert.trim_end_matches("...")));

    // the caller's notification keeps its alert
    assert_eq!(notification.alert().unwrap().chars().count(), 150);
    Ok(())
}

#[test]
fn test_cyrillic_alert_is_shortened_on_char_boundary() -> anyhow::Result<()> {
    let notification = Notification::new()
        .with_alert("Съешь же ещё этих мягких французских булок, да выпей чаю. ".repeat(3))
        .with_custom_property("lang", "ru");

    let frame = FrameEncoder::new().encode(&notification, PLAIN_TOKEN)?;
    assert!(frame.len() <= MAX_FRAME_SIZE);

    // re-decoding must not hit a split sequence
    let text = std::str::from_utf8(frame.payload())?;
    let alert = payload_of(&frame).alert().unwrap().to_string();
    assert!(text.contains(&alert));
    assert!(alert.ends_with("..."));
    Ok(())
}

#[test]
fn test_huge_custom_properties_rejected() {
    let notification = Notification::new()
        .with_alert("This alert is long enough to need truncation but nothing can save it")
        .with_custom_property("blob", "x".repeat(MAX_FRAME_SIZE));

    let err = FrameEncoder::new()
        .encode(&notification, PLAIN_TOKEN)
        .unwrap_err();

    match err {
        EncodeError::ExceededMessageSize { size, limit, frame } => {
            assert_eq!(limit, MAX_FRAME_SIZE);
            assert!(size > limit);
            assert_eq!(payload_of(&frame).alert(), Some("..."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_oversized_without_alert_rejected() {
    let notification = Notification::new().with_custom_property("blob", "x".repeat(250));

    let err = FrameEncoder::new()
        .encode(&notification, PLAIN_TOKEN)
        .unwrap_err();
    let frame = err.frame().expect("size error carries the frame");

    assert!(frame.len() > MAX_FRAME_SIZE);
    assert!(payload_of(frame).alert().is_none());
}

#[test]
fn test_frame_parse_roundtrip() -> anyhow::Result<()> {
    let notification = Notification::new().with_alert("Ping").with_badge(1);
    let frame = FrameEncoder::new().encode(&notification, WRAPPED_TOKEN)?;

    let parsed = Frame::parse(frame.as_bytes().to_vec())?;
    assert_eq!(parsed.device_token(), hex::decode(PLAIN_TOKEN)?.as_slice());
    assert_eq!(payload_of(&parsed), PayloadBuilder::new().build_fields(&notification));
    assert_eq!(parsed.len(), HEADER_LEN + parsed.payload().len());
    Ok(())
}

#[test]
fn test_quote_heavy_alert_fits_after_truncation() -> anyhow::Result<()> {
    // 60 quotes in 150 characters: 210 escaped bytes, too big for one frame
    let notification = Notification::new().with_alert(r#""ok" "#.repeat(40));
    assert_eq!(notification.alert().map(|a| a.chars().count()), Some(150));

    let frame = FrameEncoder::new().encode(&notification, PLAIN_TOKEN)?;
    assert!(frame.len() < MAX_FRAME_SIZE);

    let alert = payload_of(&frame).alert().unwrap().to_string();
    assert!(alert.ends_with("..."));
    assert!(alert.starts_with(r#""ok" "ok""#));
    assert!(alert.chars().count() < 150);
    Ok(())
}
