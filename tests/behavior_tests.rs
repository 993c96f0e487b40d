//! Edge-case behavior of the flattening, encoding and decoding rules.

use serde::{Deserialize, Serialize};
use serde_tabular::{
    decode, dump, encode, from_str, from_str_with_options, record, to_string, Cell, Coercion,
    DuplicatePolicy, Error, RowBuffer, RowValues, Schema, TabularOptions, ValueKind, UNSUPPORTED,
};
use std::collections::BTreeMap;
use std::sync::Arc;

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
    struct Contact {
        name: String => "contact",
        phone: String => "phone",
    }
}

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
    struct Company {
        name: String => "company",
        contact: Contact => ",inline",
    }
}

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
    struct Employee {
        id: u32 => "id",
        manager: Option<Arc<Contact>> => ",inline",
        office: Contact => "office",
        bonus: Option<f64> => "bonus,precision:2",
        skills: Vec<String> => "skills",
        ratings: BTreeMap<String, u8> => "ratings",
        badge: Option<u32> => "badge",
    }
}

fn values(pairs: &[(&str, &str)]) -> RowValues {
    pairs.iter().copied().collect()
}

#[test]
fn test_collision_last_wins_on_decode() {
    let schema = Schema::of::<Company>().unwrap();
    assert_eq!(schema.header(), ["company", "contact", "phone"]);
    assert_eq!(schema.duplicates(), ["name"]);

    let row = values(&[("company", "Acme"), ("contact", "Bob"), ("phone", "555")]);
    let company: Company = decode(&schema, &TabularOptions::default(), &row).unwrap();
    // Both `name` fields resolve to the option visited last.
    assert_eq!(company.name, "Bob");
    assert_eq!(company.contact.name, "Bob");
    assert_eq!(company.contact.phone, "555");
}

#[test]
fn test_collision_rejected_on_request() {
    let options = TabularOptions::new().with_duplicates(DuplicatePolicy::Reject);
    let err = to_string_with(&[Company::default()], &options).unwrap_err();
    assert!(matches!(err, Error::DuplicateField { ref ident } if ident == "name"));
}

fn to_string_with<T: serde_tabular::Element>(
    records: &[T],
    options: &TabularOptions,
) -> serde_tabular::Result<String> {
    serde_tabular::to_string_with_options(records, options.clone())
}

#[test]
fn test_employee_columns() {
    let schema = Schema::of::<Employee>().unwrap();
    assert_eq!(
        schema.header(),
        ["id", "contact", "phone", "bonus", "skills", "ratings", "badge"]
    );
}

#[test]
fn test_encode_absent_values() {
    let schema = Schema::of::<Employee>().unwrap();
    let employee = Employee {
        id: 3,
        skills: vec!["rust".to_string()],
        ..Default::default()
    };
    let mut cells: Vec<Cell> = Vec::new();
    encode(&employee, &schema, &TabularOptions::default(), &mut cells).unwrap();
    assert_eq!(
        cells,
        vec![
            Cell::new("3", ValueKind::Uint),
            Cell::null(),
            Cell::null(),
            Cell::null(),
            Cell::unsupported(),
            Cell::unsupported(),
            Cell::null(),
        ]
    );
}

#[test]
fn test_absent_reference_round_trip() {
    let employees = vec![
        Employee {
            id: 1,
            manager: Some(Arc::new(Contact {
                name: "Ann".to_string(),
                phone: "1".to_string(),
            })),
            bonus: Some(10.5),
            badge: Some(7),
            ..Default::default()
        },
        Employee {
            id: 2,
            ..Default::default()
        },
    ];
    let text = to_string(&employees).unwrap();
    assert_eq!(
        text,
        format!(
            "id,contact,phone,bonus,skills,ratings,badge\n\
             1,Ann,1,10.50,{u},{u},7\n\
             2,,,,{u},{u},\n",
            u = UNSUPPORTED
        )
    );

    let back: Vec<Employee> = from_str(&text).unwrap();
    assert_eq!(back, employees);
}

#[test]
fn test_non_inline_record_not_populated() {
    let schema = Schema::of::<Employee>().unwrap();
    let row = values(&[("office", "HQ"), ("contact", ""), ("id", "9")]);
    let employee: Employee = decode(&schema, &TabularOptions::default(), &row).unwrap();
    assert_eq!(employee.id, 9);
    assert_eq!(employee.office, Contact::default());
    assert!(employee.manager.is_none());
}

#[test]
fn test_missing_columns_tolerated() {
    let employees: Vec<Employee> = from_str("id,unknown\n5,zzz\n").unwrap();
    assert_eq!(
        employees,
        vec![Employee {
            id: 5,
            ..Default::default()
        }]
    );
}

#[test]
fn test_lenient_coercion_keeps_going() {
    let employees: Vec<Employee> = from_str("id,bonus,badge\nx,1.5,y\n2,oops,3\n").unwrap();
    assert_eq!(employees[0].id, 0);
    assert_eq!(employees[0].bonus, Some(1.5));
    assert_eq!(employees[0].badge, Some(0));
    assert_eq!(employees[1].bonus, Some(0.0));
    assert_eq!(employees[1].badge, Some(3));
}

#[test]
fn test_strict_coercion_fails() {
    let options = TabularOptions::new().with_coercion(Coercion::Strict);
    let result: Result<Vec<Employee>, _> = from_str_with_options("id,badge\n1,seven\n", options);
    assert!(matches!(
        result,
        Err(Error::Coercion { ref column, .. }) if column == "badge"
    ));
}

#[test]
fn test_decode_rounds_to_precision() {
    let employees: Vec<Employee> = from_str("id,bonus\n1,2.345\n2,-2.345\n").unwrap();
    assert_eq!(employees[0].bonus, Some(2.35));
    assert_eq!(employees[1].bonus, Some(-2.35));
}

#[test]
fn test_nil_element_reported_before_output() {
    let records: Vec<Option<Arc<Contact>>> = vec![Some(Arc::new(Contact::default())), None];
    let mut sink = RowBuffer::new();
    let err = dump(&records, &TabularOptions::default(), &mut sink).unwrap_err();
    assert!(matches!(err, Error::NilElement { index: 1 }));
    assert!(sink.rows().is_empty());
}

#[test]
fn test_header_order_follows_input() {
    let contacts: Vec<Contact> = from_str("phone,contact\n123,Zed\n").unwrap();
    assert_eq!(
        contacts,
        vec![Contact {
            name: "Zed".to_string(),
            phone: "123".to_string(),
        }]
    );
}
