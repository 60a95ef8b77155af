//! Integration tests for the `ProtoOneof` derive macro.

use protodsl::codec::{
    decode_oneof_field, encode_oneof_field, encoded_oneof_field_len, LenCache, ProtoBytes,
    ProtoEncode, ProtoMessage, ProtoOneof, ProtoString,
};
use protodsl::error::DecodeError;
use protodsl::wire::{self, WireType};
use protodsl::{ProtoMessage, ProtoOneof};

/// Test oneof using derive macro.
/// Equivalent to:
/// ```protobuf
/// oneof test_oneof {
///     int32 int_value = 1;
///     string string_value = 2;
///     bool bool_value = 3;
///     bytes bytes_value = 4;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, ProtoOneof)]
pub enum TestOneof {
    #[proto(tag = 1)]
    IntValue(i32),
    #[proto(tag = 2)]
    StringValue(ProtoString),
    #[proto(tag = 3)]
    BoolValue(bool),
    #[proto(tag = 4)]
    BytesValue(ProtoBytes),
}

fn roundtrip_oneof(value: TestOneof) {
    let mut cache = LenCache::new();
    let variant_len = value.encoded_variant_len(&mut cache);
    let mut buf = Vec::new();
    let mut reader = cache.reader();
    value.encode_variant(&mut buf, &mut reader);
    assert_eq!(buf.len(), variant_len);

    let mut slice = &buf[..];
    let key = wire::decode_key(&mut slice).unwrap();
    let (wire_type, tag) = key.into_parts();
    let decoded = TestOneof::decode_variant(tag, wire_type, &mut slice, 0)
        .expect("decode failed")
        .expect("tag not recognized");

    assert_eq!(decoded, value);
}

#[test]
fn test_derived_oneof_roundtrip_int() {
    roundtrip_oneof(TestOneof::IntValue(0));
    roundtrip_oneof(TestOneof::IntValue(42));
    roundtrip_oneof(TestOneof::IntValue(-1));
    roundtrip_oneof(TestOneof::IntValue(i32::MAX));
    roundtrip_oneof(TestOneof::IntValue(i32::MIN));
}

#[test]
fn test_derived_oneof_roundtrip_string() {
    roundtrip_oneof(TestOneof::StringValue(ProtoString::from("")));
    roundtrip_oneof(TestOneof::StringValue(ProtoString::from("hello")));
    roundtrip_oneof(TestOneof::StringValue(ProtoString::from("hello world! 🎉")));
}

#[test]
fn test_derived_oneof_roundtrip_bool() {
    roundtrip_oneof(TestOneof::BoolValue(true));
    roundtrip_oneof(TestOneof::BoolValue(false));
}

#[test]
fn test_derived_oneof_roundtrip_bytes() {
    roundtrip_oneof(TestOneof::BytesValue(ProtoBytes::from(&[][..])));
    roundtrip_oneof(TestOneof::BytesValue(ProtoBytes::from(&[1, 2, 3][..])));
    roundtrip_oneof(TestOneof::BytesValue(ProtoBytes::from(&[0u8; 100][..])));
}

#[test]
fn test_derived_oneof_variant_tag() {
    assert_eq!(TestOneof::IntValue(42).variant_tag(), 1);
    assert_eq!(
        TestOneof::StringValue(ProtoString::from("test")).variant_tag(),
        2
    );
    assert_eq!(TestOneof::BoolValue(true).variant_tag(), 3);
    assert_eq!(
        TestOneof::BytesValue(ProtoBytes::from(&[1][..])).variant_tag(),
        4
    );
}

#[test]
fn test_derived_oneof_variant_wire_type() {
    assert_eq!(
        TestOneof::IntValue(42).variant_wire_type(),
        WireType::Varint
    );
    assert_eq!(
        TestOneof::StringValue(ProtoString::from("test")).variant_wire_type(),
        WireType::Len
    );
    assert_eq!(
        TestOneof::BoolValue(true).variant_wire_type(),
        WireType::Varint
    );
    assert_eq!(
        TestOneof::BytesValue(ProtoBytes::from(&[1][..])).variant_wire_type(),
        WireType::Len
    );
}

#[test]
fn test_derived_oneof_unknown_tag() {
    // Encode an int with tag 99 (not in our oneof)
    let mut buf = Vec::new();
    wire::encode_key(WireType::Varint, 99, &mut buf);
    42i32.encode(&mut buf);

    let mut slice = &buf[..];
    let key = wire::decode_key(&mut slice).unwrap();
    let (wire_type, tag) = key.into_parts();
    let result = TestOneof::decode_variant(tag, wire_type, &mut slice, 0).unwrap();

    // Should return None for unknown tag
    assert_eq!(result, None);
}

#[test]
fn test_derived_oneof_option_helpers() {
    let mut oneof: Option<TestOneof> = None;

    // Encode a value
    let mut buf = Vec::new();
    wire::encode_key(WireType::Varint, 1, &mut buf);
    42i32.encode(&mut buf);

    // Decode into Option
    let mut slice = &buf[..];
    let key = wire::decode_key(&mut slice).unwrap();
    let (wire_type, tag) = key.into_parts();
    let matched = decode_oneof_field(&mut oneof, tag, wire_type, &mut slice, 0).unwrap();

    assert!(matched);
    assert_eq!(oneof, Some(TestOneof::IntValue(42)));

    // Test encode_oneof_field / encoded_oneof_field_len
    let mut cache = LenCache::new();
    let field_len = encoded_oneof_field_len(&oneof, &mut cache);
    let mut encoded = Vec::new();
    let mut reader = cache.reader();
    encode_oneof_field(&oneof, &mut encoded, &mut reader);
    assert_eq!(encoded.len(), field_len);

    // Decode and verify
    let mut slice = &encoded[..];
    let key = wire::decode_key(&mut slice).unwrap();
    let (wire_type, tag) = key.into_parts();
    let mut decoded: Option<TestOneof> = None;
    decode_oneof_field(&mut decoded, tag, wire_type, &mut slice, 0).unwrap();
    assert_eq!(decoded, Some(TestOneof::IntValue(42)));
}

#[test]
fn test_derived_oneof_last_one_wins() {
    let mut oneof: Option<TestOneof> = None;

    // First, set to IntValue
    let mut buf1 = Vec::new();
    wire::encode_key(WireType::Varint, 1, &mut buf1);
    42i32.encode(&mut buf1);

    let mut slice1 = &buf1[..];
    let key1 = wire::decode_key(&mut slice1).unwrap();
    let (wire_type1, tag1) = key1.into_parts();
    decode_oneof_field(&mut oneof, tag1, wire_type1, &mut slice1, 0).unwrap();
    assert_eq!(oneof, Some(TestOneof::IntValue(42)));

    // Then set to BoolValue - should replace
    let mut buf2 = Vec::new();
    wire::encode_key(WireType::Varint, 3, &mut buf2);
    true.encode(&mut buf2);

    let mut slice2 = &buf2[..];
    let key2 = wire::decode_key(&mut slice2).unwrap();
    let (wire_type2, tag2) = key2.into_parts();
    decode_oneof_field(&mut oneof, tag2, wire_type2, &mut slice2, 0).unwrap();
    assert_eq!(oneof, Some(TestOneof::BoolValue(true))); // Replaced!
}

/// A oneof for use in message tests.
/// Equivalent to:
/// ```protobuf
/// oneof widget {
///     int32 int_field = 2;
///     string string_field = 3;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, ProtoOneof)]
pub enum Widget {
    #[proto(tag = 2)]
    IntField(i32),
    #[proto(tag = 3)]
    StringField(ProtoString),
}

/// Message containing a oneof field.
/// Equivalent to:
/// ```protobuf
/// message MessageWithOneof {
///     string name = 1;
///     oneof widget {
///         int32 int_field = 2;
///         string string_field = 3;
///     }
///     int32 count = 4;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, ProtoMessage)]
pub struct MessageWithOneof {
    #[proto(tag = 1)]
    pub name: ProtoString,
    #[proto(oneof, tags = "2, 3")]
    pub widget: Option<Widget>,
    #[proto(tag = 4)]
    pub count: i32,
}

#[test]
fn test_message_with_oneof_roundtrip() {
    // Test with int variant
    let msg = MessageWithOneof {
        name: ProtoString::from("test"),
        widget: Some(Widget::IntField(42)),
        count: 10,
    };

    let mut buf = Vec::new();
    msg.write(&mut buf);
    let decoded = MessageWithOneof::full_read(&buf[..]).unwrap();

    assert_eq!(decoded, msg);
}

#[test]
fn test_message_with_oneof_string_variant() {
    let msg = MessageWithOneof {
        name: ProtoString::from("hello"),
        widget: Some(Widget::StringField(ProtoString::from("world"))),
        count: 5,
    };

    let mut buf = Vec::new();
    msg.write(&mut buf);
    let decoded = MessageWithOneof::full_read(&buf[..]).unwrap();

    assert_eq!(decoded, msg);
}

#[test]
fn test_message_with_oneof_none() {
    let msg = MessageWithOneof {
        name: ProtoString::from("no widget"),
        widget: None,
        count: 100,
    };

    let mut buf = Vec::new();
    msg.write(&mut buf);
    let decoded = MessageWithOneof::full_read(&buf[..]).unwrap();

    assert_eq!(decoded, msg);
    assert!(decoded.widget.is_none());
}

#[test]
fn test_message_with_oneof_last_one_wins() {
    // Manually encode a message body with two values for the same oneof
    // (this tests that last-one-wins semantics work at the message level).
    let mut body = Vec::new();

    wire::encode_key(WireType::Len, 1, &mut body);
    ProtoString::from("test").encode(&mut body);

    wire::encode_key(WireType::Varint, 2, &mut body);
    42i32.encode(&mut body);

    wire::encode_key(WireType::Len, 3, &mut body);
    ProtoString::from("winner").encode(&mut body);

    wire::encode_key(WireType::Varint, 4, &mut body);
    99i32.encode(&mut body);

    let decoded = MessageWithOneof::full_read(&body[..]).unwrap();

    assert_eq!(decoded.name, ProtoString::from("test"));
    assert_eq!(
        decoded.widget,
        Some(Widget::StringField(ProtoString::from("winner")))
    );
    assert_eq!(decoded.count, 99);
}

/// Test with a oneof containing a nested message using `Box`.
#[derive(Debug, Clone, PartialEq, Default, ProtoMessage)]
pub struct NestedMessage {
    #[proto(tag = 1)]
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, ProtoOneof)]
pub enum OneofWithNested {
    #[proto(tag = 1)]
    Simple(i32),
    #[proto(tag = 2, message)]
    Nested(Box<NestedMessage>),
}

#[test]
fn test_derived_oneof_with_boxed_message() {
    let nested = NestedMessage { value: 123 };
    let oneof = OneofWithNested::Nested(Box::new(nested));

    let mut cache = LenCache::new();
    let _ = oneof.encoded_variant_len(&mut cache);
    let mut buf = Vec::new();
    let mut reader = cache.reader();
    oneof.encode_variant(&mut buf, &mut reader);

    let mut slice = &buf[..];
    let key = wire::decode_key(&mut slice).unwrap();
    let (wire_type, tag) = key.into_parts();
    let decoded = OneofWithNested::decode_variant(tag, wire_type, &mut slice, 0)
        .unwrap()
        .unwrap();

    match decoded {
        OneofWithNested::Nested(msg) => {
            assert_eq!(msg.value, 123);
        }
        _ => panic!("expected Nested variant"),
    }
}

/// Required oneof enum for testing.
#[derive(Debug, Clone, PartialEq, ProtoOneof)]
pub enum RequiredWidget {
    #[proto(tag = 2)]
    IntValue(i32),
    #[proto(tag = 3)]
    StringValue(ProtoString),
}

impl Default for RequiredWidget {
    fn default() -> Self {
        Self::IntValue(0)
    }
}

/// Message with a required oneof field.
#[derive(Debug, Clone, Default, ProtoMessage)]
pub struct MessageWithRequiredOneof {
    #[proto(tag = 1)]
    pub name: ProtoString,
    #[proto(oneof, tags = "2, 3", required)]
    pub widget: RequiredWidget,
}

#[test]
fn test_required_oneof_present_succeeds() {
    let msg = MessageWithRequiredOneof {
        name: ProtoString::from("test"),
        widget: RequiredWidget::IntValue(42),
    };

    let mut buf = Vec::new();
    msg.write(&mut buf);

    let decoded =
        MessageWithRequiredOneof::full_read(&buf[..]).expect("decode should succeed");

    assert_eq!(decoded.name.as_str(), "test");
    assert_eq!(decoded.widget, RequiredWidget::IntValue(42));
}

#[test]
fn test_required_oneof_missing_fails() {
    // Encode a message body WITHOUT the required oneof (just the name field).
    let mut body = Vec::new();
    wire::encode_key(WireType::Len, 1, &mut body);
    let name = ProtoString::from("test");
    name.encode(&mut body);
    // Note: We deliberately don't encode the oneof field.

    let result = MessageWithRequiredOneof::full_read(&body[..]);
    assert_eq!(result, Err(DecodeError::RequiredFieldMissing));
}

#[test]
fn test_required_oneof_roundtrip_string_variant() {
    let msg = MessageWithRequiredOneof {
        name: ProtoString::from("hello"),
        widget: RequiredWidget::StringValue(ProtoString::from("world")),
    };

    let mut buf = Vec::new();
    msg.write(&mut buf);

    let decoded =
        MessageWithRequiredOneof::full_read(&buf[..]).expect("decode should succeed");

    assert_eq!(decoded.name.as_str(), "hello");
    match decoded.widget {
        RequiredWidget::StringValue(s) => assert_eq!(s.as_str(), "world"),
        _ => panic!("expected StringValue variant"),
    }
}
