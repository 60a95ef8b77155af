//! Hand-written example of what `#[derive(ProtoMessage)]` generates, for:
//!
//! ```proto
//! message PhoneNumber {
//!     required string number = 1;
//!     optional int32 type = 2;
//! }
//!
//! message Person {
//!     required string name = 1;
//!     optional int32 id = 2;
//!     optional string email = 3;
//!     repeated PhoneNumber phones = 4;
//! }
//! ```

use protodsl::codec::{
    decode_message_field, encode_message_field, encoded_message_field_len, LenCache,
    LenCacheReader, ProtoDecode, ProtoEncode, ProtoMessage, ProtoString,
};
use protodsl::error::DecodeError;
use protodsl::wire::{decode_key, encode_key, skip_field, WireType};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhoneNumber {
    pub number: ProtoString,
    pub phone_type: i32,
}

impl ProtoMessage for PhoneNumber {
    fn decode_message<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
        let mut number = ProtoString::default();
        let mut phone_type = 0i32;
        let mut number_seen = false;

        while buf.has_remaining() {
            let key = decode_key(buf)?;
            let (wire_type, tag) = key.into_parts();
            match tag {
                1 => {
                    ProtoString::decode_into(buf, &mut number, 0)?;
                    number_seen = true;
                }
                2 => i32::decode_into(buf, &mut phone_type, 0)?,
                _ => skip_field(wire_type, buf)?,
            }
        }

        if !number_seen {
            return Err(DecodeError::RequiredFieldMissing);
        }
        Ok(PhoneNumber { number, phone_type })
    }

    fn encoded_message_len(&self, _cache: &mut LenCache) -> usize {
        let mut len = protodsl::wire::encoded_key_len(1) + self.number.encoded_len();
        if self.phone_type != 0 {
            len += protodsl::wire::encoded_key_len(2) + self.phone_type.encoded_len();
        }
        len
    }

    fn encode_message<B: bytes::BufMut>(&self, buf: &mut B, _cache: &mut LenCacheReader<'_>) {
        encode_key(WireType::Len, 1, buf);
        self.number.encode(buf);
        if self.phone_type != 0 {
            encode_key(WireType::Varint, 2, buf);
            self.phone_type.encode(buf);
        }
    }

    fn msg_def() -> String {
        protodsl::schema::message_def(
            "PhoneNumber",
            &[
                protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Required,
                    "string",
                    "number",
                    1,
                    None,
                )
                .expect("field name is not reserved"),
                protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Optional,
                    "int32",
                    "type",
                    2,
                    None,
                )
                .expect("field name is not reserved"),
            ],
        )
        .expect("message type name is not reserved")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub name: ProtoString,
    pub id: i32,
    pub email: ProtoString,
    pub phones: Vec<PhoneNumber>,
}

impl ProtoMessage for Person {
    fn decode_message<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
        let mut name = ProtoString::default();
        let mut id = 0i32;
        let mut email = ProtoString::default();
        let mut phones = Vec::new();
        let mut name_seen = false;

        while buf.has_remaining() {
            let key = decode_key(buf)?;
            let (wire_type, tag) = key.into_parts();
            match tag {
                1 => {
                    ProtoString::decode_into(buf, &mut name, 0)?;
                    name_seen = true;
                }
                2 => i32::decode_into(buf, &mut id, 0)?,
                3 => ProtoString::decode_into(buf, &mut email, 0)?,
                4 => phones.push(decode_message_field(buf)?),
                _ => skip_field(wire_type, buf)?,
            }
        }

        if !name_seen {
            return Err(DecodeError::RequiredFieldMissing);
        }
        Ok(Person {
            name,
            id,
            email,
            phones,
        })
    }

    fn encoded_message_len(&self, cache: &mut LenCache) -> usize {
        let mut len = protodsl::wire::encoded_key_len(1) + self.name.encoded_len();
        if self.id != 0 {
            len += protodsl::wire::encoded_key_len(2) + self.id.encoded_len();
        }
        if !self.email.is_empty() {
            len += protodsl::wire::encoded_key_len(3) + self.email.encoded_len();
        }
        for phone in &self.phones {
            len += protodsl::wire::encoded_key_len(4) + encoded_message_field_len(phone, cache);
        }
        len
    }

    fn encode_message<B: bytes::BufMut>(&self, buf: &mut B, cache: &mut LenCacheReader<'_>) {
        encode_key(WireType::Len, 1, buf);
        self.name.encode(buf);
        if self.id != 0 {
            encode_key(WireType::Varint, 2, buf);
            self.id.encode(buf);
        }
        if !self.email.is_empty() {
            encode_key(WireType::Len, 3, buf);
            self.email.encode(buf);
        }
        for phone in &self.phones {
            encode_key(WireType::Len, 4, buf);
            encode_message_field(phone, buf, cache);
        }
    }

    fn msg_def() -> String {
        protodsl::schema::message_def(
            "Person",
            &[
                protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Required,
                    "string",
                    "name",
                    1,
                    None,
                )
                .expect("field name is not reserved"),
                protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Optional,
                    "int32",
                    "id",
                    2,
                    None,
                )
                .expect("field name is not reserved"),
                protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Optional,
                    "string",
                    "email",
                    3,
                    None,
                )
                .expect("field name is not reserved"),
                protodsl::schema::repeated_field_def("PhoneNumber", "phones", 4, false)
                    .expect("field name is not reserved"),
            ],
        )
        .expect("message type name is not reserved")
    }
}

fn main() {
    let person = Person {
        name: ProtoString::from("Alice"),
        id: 123,
        email: ProtoString::from("alice@example.com"),
        phones: vec![
            PhoneNumber {
                number: ProtoString::from("555-1234"),
                phone_type: 1,
            },
            PhoneNumber {
                number: ProtoString::from("555-5678"),
                phone_type: 2,
            },
        ],
    };

    let mut buf = Vec::new();
    person.write(&mut buf);
    println!("Encoded {} bytes", buf.len());
    println!("Raw bytes: {:02x?}", buf);
    println!();

    let decoded = Person::full_read(&buf[..]).unwrap();
    println!("Decoded Person:");
    println!("  name: {}", &*decoded.name);
    println!("  id: {}", decoded.id);
    println!("  email: {}", &*decoded.email);
    for (i, phone) in decoded.phones.iter().enumerate() {
        println!(
            "  phone[{}]: {} (type={})",
            i, &*phone.number, phone.phone_type
        );
    }

    assert_eq!(decoded, person);
}
