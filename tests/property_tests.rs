//! Property-based tests for the dump/load round trip.
//!
//! Integers and text come back exactly; floats come back exactly when written
//! with shortest round-trip text, and as their rounded value under a precision.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_tabular::{from_str, record, to_string, Workbook};

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
    struct Place {
        city: String => "city",
        zip: u32 => "zip",
    }
}

record! {
    #[derive(Serialize, Deserialize, Default, Debug, PartialEq, Clone)]
    struct Sample {
        label: String => "label",
        small: i8 => "small",
        count: u64 => "count",
        delta: i64 => "delta",
        ratio: f64 => "ratio",
        cents: f64 => "cents,precision:2",
        flag: bool => "flag",
        extra: Option<i32> => "extra",
        place: Place => ",inline",
    }
}

fn place() -> impl Strategy<Value = Place> {
    ("[a-zA-Z][a-zA-Z ]{0,10}", any::<u32>()).prop_map(|(city, zip)| Place { city, zip })
}

fn sample() -> impl Strategy<Value = Sample> {
    (
        "[a-zA-Z0-9 _.-]{0,16}",
        any::<i8>(),
        any::<u64>(),
        any::<i64>(),
        -1.0e9..1.0e9f64,
        -100_000_000i64..100_000_000,
        any::<bool>(),
        proptest::option::of(any::<i32>()),
        place(),
    )
        .prop_map(
            |(label, small, count, delta, ratio, cents, flag, extra, place)| Sample {
                label,
                small,
                count,
                delta,
                ratio,
                cents: cents as f64 / 100.0,
                flag,
                extra,
                place,
            },
        )
}

fn roundtrip(samples: &[Sample]) -> bool {
    match to_string(samples) {
        Ok(text) => match from_str::<Sample>(&text) {
            Ok(back) => back == samples,
            Err(e) => {
                eprintln!("Load failed: {}", e);
                eprintln!("Dumped was: {}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Dump failed: {}", e);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_text_round_trip(samples in prop::collection::vec(sample(), 1..8)) {
        prop_assert!(roundtrip(&samples));
    }

    #[test]
    fn prop_sheet_round_trip(samples in prop::collection::vec(sample(), 1..8)) {
        let mut book = Workbook::new();
        book.dump("samples", &samples).unwrap();

        let mut back: Vec<Sample> = Vec::new();
        book.load("samples", &mut back).unwrap();
        prop_assert_eq!(back.len(), samples.len());
        for (loaded, original) in back.iter().zip(&samples) {
            prop_assert_eq!(&loaded.label, &original.label);
            prop_assert_eq!(loaded.count, original.count);
            prop_assert_eq!(loaded.cents, original.cents);
            prop_assert_eq!(&loaded.place, &original.place);
            prop_assert!((loaded.ratio - original.ratio).abs() <= 1e-6);
        }
    }

    #[test]
    fn prop_header_matches_every_row(samples in prop::collection::vec(sample(), 1..8)) {
        let text = to_string(&samples).unwrap();
        let widths: Vec<usize> = text.lines().map(|line| line.split(',').count()).collect();
        prop_assert_eq!(widths.len(), samples.len() + 1);
        prop_assert!(widths.iter().all(|w| *w == widths[0]));
    }
}
