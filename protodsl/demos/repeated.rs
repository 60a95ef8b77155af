//! Demonstrates repeated fields: message-typed (`Vec<T>`, always eager,
//! since message types never implement `ProtoDecode`/`ProtoEncode`) and
//! scalar (`Repeated<T>`, lazily re-sliced from the original buffer on
//! iteration instead of being decoded up front).
//!
//! Equivalent to:
//! ```proto
//! message PhoneNumber {
//!     string number = 1;
//!     int32 type = 2;
//! }
//!
//! message Person {
//!     string name = 1;
//!     int32 id = 2;
//!     repeated PhoneNumber phones = 3;
//!     repeated int32 scores = 4;
//! }
//! ```

use protodsl::codec::{ProtoMessage, ProtoString, Repeated};
use protodsl::ProtoMessage as ProtoMessageDerive;

#[derive(Debug, Clone, Default, PartialEq, ProtoMessageDerive)]
pub struct PhoneNumber {
    #[proto(tag = 1)]
    pub number: ProtoString,
    #[proto(tag = 2)]
    pub phone_type: i32,
}

/// `phones` is eagerly decoded into owned `PhoneNumber` values: message
/// types never implement `ProtoDecode`, so there's no lazy path for them.
/// `scores` stays lazy — `Repeated<i32>` re-slices the original buffer on
/// `iter()` instead of allocating a `Vec<i32>` up front.
#[derive(Debug, Default, ProtoMessageDerive)]
pub struct Person {
    #[proto(tag = 1)]
    pub name: ProtoString,
    #[proto(tag = 2)]
    pub id: i32,
    #[proto(tag = 3, repeated, message)]
    pub phones: Vec<PhoneNumber>,
    #[proto(tag = 4, repeated)]
    pub scores: Repeated<i32>,
}

fn main() {
    let phone1 = PhoneNumber {
        number: ProtoString::from("555-1234"),
        phone_type: 1,
    };
    let phone2 = PhoneNumber {
        number: ProtoString::from("555-5678"),
        phone_type: 2,
    };

    let person = Person {
        name: ProtoString::from("Alice"),
        id: 123,
        phones: vec![phone1, phone2],
        scores: Repeated::owned(vec![100, 95, 87]),
    };

    let mut buf = Vec::new();
    person.write(&mut buf);
    println!("Encoded {} bytes: {:02x?}", buf.len(), buf);

    let decoded = Person::full_read(&buf[..]).unwrap();
    println!("{decoded:#?}");

    println!("phones (eager):");
    for phone in &decoded.phones {
        println!("  {phone:?}");
    }

    println!("scores (lazy, re-sliced on iteration):");
    for score in decoded.scores.iter() {
        println!("  {}", score.unwrap());
    }
}
