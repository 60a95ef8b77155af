//! Demonstrates the derive macro with a simple message.

use protodsl::codec::{ProtoMessage, ProtoString};
use protodsl::ProtoMessage as ProtoMessageDerive;

#[derive(Debug, Default, PartialEq, ProtoMessageDerive)]
pub struct PhoneNumber {
    #[proto(tag = 1)]
    pub number: ProtoString,
    #[proto(tag = 2)]
    pub phone_type: i32,
}

fn main() {
    let phone = PhoneNumber {
        number: ProtoString::from("555-1234"),
        phone_type: 1,
    };

    let mut buf = Vec::new();
    phone.write(&mut buf);
    println!("Encoded {} bytes: {:02x?}", buf.len(), buf);

    let decoded = PhoneNumber::full_read(&buf[..]).unwrap();
    println!("Decoded: {decoded:?}");

    assert_eq!(phone, decoded);
    println!("Roundtrip successful!");
}
