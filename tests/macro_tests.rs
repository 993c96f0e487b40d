use serde::{Deserialize, Serialize};
use serde_tabular::{
    from_str, record, to_string, Element, FieldShape, Record, Schema, Shaped,
};

mod model {
    use super::*;

    record! {
        /// A record declared in another module.
        #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
        pub struct Shipment {
            pub id: u64 => "id",
            pub(crate) weight: f32 => "weight,precision:1",
            pub origin: Port => "from,inline",
            #[serde(default)]
            pub memo: String,
        }
    }

    record! {
        #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
        pub struct Port {
            pub code: String => "port",
            pub country: String => "country",
        }
    }
}

use model::{Port, Shipment};

#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone, Copy)]
enum Status {
    #[default]
    Open,
    Closed,
}

impl Shaped for Status {}

record! {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Ticket {
        id: u32 => "id",
        status: Status => "status",
    }
}

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct Trailing {
        a: i8 => "a",
        b: i8 => "b",
    }
}

#[test]
fn test_field_table_in_declaration_order() {
    let idents: Vec<&str> = Shipment::fields().iter().map(|f| f.ident).collect();
    assert_eq!(idents, ["id", "weight", "origin", "memo"]);

    let tags: Vec<Option<&str>> = Shipment::fields().iter().map(|f| f.tag).collect();
    assert_eq!(
        tags,
        [
            Some("id"),
            Some("weight,precision:1"),
            Some("from,inline"),
            None
        ]
    );
}

#[test]
fn test_record_shape_and_element() {
    assert!(matches!(<Port as Shaped>::SHAPE, FieldShape::Record(_)));
    assert!(matches!(<Status as Shaped>::SHAPE, FieldShape::Value));
    assert!(!<Shipment as Element>::BY_REFERENCE);
    assert!(<Box<Shipment> as Element>::BY_REFERENCE);
    assert!(<Option<Box<Shipment>> as Element>::BY_REFERENCE);
}

#[test]
fn test_inline_name_is_not_a_column() {
    let schema = Schema::of::<Shipment>().unwrap();
    assert_eq!(schema.header(), ["id", "weight", "port", "country"]);
    assert_eq!(schema.option("origin").unwrap().name, "from");
}

#[test]
fn test_declared_record_round_trip() {
    let shipment = Shipment {
        id: 42,
        weight: 12.5,
        origin: Port {
            code: "RTM".to_string(),
            country: "NL".to_string(),
        },
        memo: "not exported".to_string(),
    };
    let text = to_string(&[shipment.clone()]).unwrap();
    assert_eq!(text, "id,weight,port,country\n42,12.5,RTM,NL\n");

    let back: Vec<Shipment> = from_str(&text).unwrap();
    assert_eq!(
        back,
        vec![Shipment {
            memo: String::new(),
            ..shipment
        }]
    );
}

#[test]
fn test_unit_enum_as_text() {
    let tickets = [
        Ticket {
            id: 1,
            status: Status::Open,
        },
        Ticket {
            id: 2,
            status: Status::Closed,
        },
    ];
    let text = to_string(&tickets).unwrap();
    assert_eq!(text, "id,status\n1,Open\n2,Closed\n");

    let back: Vec<Ticket> = from_str(&text).unwrap();
    assert_eq!(back, tickets);
}

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
    struct Token {
        r#type: String => "type",
        r#ref: u32 => "ref",
    }
}

#[test]
fn test_raw_identifier_fields() {
    let idents: Vec<&str> = Token::fields().iter().map(|f| f.ident).collect();
    assert_eq!(idents, ["type", "ref"]);

    let tokens = vec![Token {
        r#type: "keyword".to_string(),
        r#ref: 7,
    }];
    let text = to_string(&tokens).unwrap();
    assert_eq!(text, "type,ref\nkeyword,7\n");

    let back: Vec<Token> = from_str(&text).unwrap();
    assert_eq!(back, tokens);
}

#[test]
fn test_enum_without_column_takes_first_variant() {
    let tickets: Vec<Ticket> = from_str("id\n1\n").unwrap();
    assert_eq!(
        tickets,
        vec![Ticket {
            id: 1,
            status: Status::Open,
        }]
    );

    let strict: serde_tabular::Result<Vec<Ticket>> =
        serde_tabular::from_str_with_options("id\n1\n", serde_tabular::TabularOptions::strict());
    assert!(matches!(strict, Err(serde_tabular::Error::UnsupportedType(_))));
}

#[test]
fn test_trailing_comma_accepted() {
    assert_eq!(Trailing::fields().len(), 2);
    assert_eq!(Trailing::default(), Trailing { a: 0, b: 0 });
}
