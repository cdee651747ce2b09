mod common;

use common::{Address, Customer, GeoPoint, Sample, finish, sink, source};
use csv_bind::{Config, Error, HeaderStyle, Marshaller, Unmarshaller, stop_on_error};

fn sample(a: &str, b: &str) -> Sample {
    Sample {
        field_a: a.to_string(),
        field_b: b.to_string(),
    }
}

#[test]
fn header_is_written_before_rows() {
    let mut m = Marshaller::<Sample, _>::new(sink()).unwrap();
    m.write(&sample("a", "b")).unwrap();
    assert_eq!(finish(m), "field_a,field_b\na,b\n");
}

#[test]
fn header_is_written_even_without_rows() {
    let m = Marshaller::<Sample, _>::new(sink()).unwrap();
    assert_eq!(finish(m), "field_a,field_b\n");
}

#[test]
fn write_all_writes_in_order() {
    let mut m = Marshaller::<Sample, _>::new(sink()).unwrap();
    let samples = vec![sample("a", "b"), sample("c", "d"), sample("A", "B")];
    m.write_all(&samples).unwrap();
    assert_eq!(finish(m), "field_a,field_b\na,b\nc,d\nA,B\n");
}

#[test]
fn write_all_any_rejects_foreign_element_types() {
    let mut m = Marshaller::<Sample, _>::new(sink()).unwrap();
    let err = m.write_all_any(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert!(err.to_string().contains("Sample"), "{err}");

    let err = m.write_any(&"text").unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    m.write_all_any(&[sample("a", "b")]).unwrap();
    m.write_any(&sample("c", "d")).unwrap();
    assert_eq!(finish(m), "field_a,field_b\na,b\nc,d\n");
}

#[test]
fn strictness_options_do_not_affect_writing() {
    let config = Config::new()
        .fail_if_unmatched_struct_fields(true)
        .fail_if_duplicate_header_names(true);
    let m = config.marshaller::<Sample, _>(sink()).unwrap();
    assert_eq!(finish(m), "field_a,field_b\n");
}

fn customer(id: u32, billing: Option<Address>) -> Customer {
    let mut customer = Customer::default();
    customer.id = id;
    customer.audit.created_by = "ops".to_string();
    customer.name = "Ada, Countess".to_string();
    customer.home = Address {
        street: "Main St".to_string(),
        zip: "111".to_string(),
    };
    customer.billing = billing.map(Box::new);
    customer.location = GeoPoint { lat: 1.5, lng: -2.0 };
    customer.cached = "never written".to_string();
    customer
}

#[test]
fn absent_optional_records_write_empty_cells() {
    let config = Config::new().header_style(HeaderStyle::Canonical);
    let mut m = config.marshaller::<Customer, _>(sink()).unwrap();
    m.write(&customer(1, None)).unwrap();
    assert_eq!(
        finish(m),
        "id,created_by,name,street,zip,street,zip,location,score\n\
         1,ops,\"Ada, Countess\",Main St,111,,,1.5;-2,\n"
    );
}

#[test]
fn all_names_header_lists_aliases() {
    let m = Marshaller::<Customer, _>::new(sink()).unwrap();
    assert_eq!(
        finish(m),
        "id,created_by,name,street,zip,postcode,street,zip,postcode,location,score\n"
    );
}

#[test]
fn written_rows_read_back_identically() {
    let config = Config::new()
        .header_style(HeaderStyle::Canonical)
        .align_duplicate_headers_with_field_order(true);
    let mut originals = vec![
        customer(1, None),
        customer(
            2,
            Some(Address {
                street: "Bill Rd".to_string(),
                zip: "333".to_string(),
            }),
        ),
    ];
    originals[1].score = Some(-4);

    let mut m = config.marshaller::<Customer, _>(sink()).unwrap();
    m.write_all(&originals).unwrap();
    let text = finish(m);

    let mut um = config.unmarshaller::<Customer, _>(source(&text)).unwrap();
    let restored = um.read_all(stop_on_error).unwrap();

    let mut expected = originals.clone();
    for record in &mut expected {
        record.cached.clear();
    }
    assert_eq!(restored, expected);
}
