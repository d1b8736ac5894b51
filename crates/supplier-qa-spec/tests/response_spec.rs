use proptest::prelude::*;
use supplier_qa_spec::{ResponseKind, ResponseSpec};

proptest! {
    #[test]
    fn parser_never_panics_under_random_inputs(encoded in ".*") {
        let _ = ResponseSpec::parse(&encoded);
    }

    #[test]
    fn prefixed_garbage_never_panics(body in "[A-Za-z0-9 ();|:]{0,40}") {
        for prefix in ["DROPDOWN:", "LIST:", "List2List:", "TEXT_NUMBER_"] {
            let _ = ResponseSpec::parse(&format!("{prefix}{body}"));
        }
    }
}

#[test]
fn literal_kinds_parse_without_options() {
    let cases = [
        ("Y/N", ResponseKind::YesNo),
        ("Y/N/NA", ResponseKind::YesNoNa),
        ("CHECKBOX", ResponseKind::Checkbox),
        ("TEXT", ResponseKind::Text),
        ("NUMBER", ResponseKind::Number),
        ("DOLLAR", ResponseKind::Dollar),
        ("DATE", ResponseKind::Date),
    ];
    for (encoded, kind) in cases {
        let spec = ResponseSpec::parse(encoded);
        assert_eq!(spec.kind, kind, "{encoded}");
        assert!(spec.options.is_empty());
    }
}

#[test]
fn multi_select_options_carry_bit_weights() {
    let spec = ResponseSpec::parse(
        "List2List:Minority Owned|Certified minority business|0;Hub Zone|HUBZone firm|3;",
    );
    assert_eq!(spec.kind, ResponseKind::MultiSelectBitmask);
    assert_eq!(spec.options.len(), 2);
    assert_eq!(spec.options[1].weight(), Some(8));
    assert_eq!(
        spec.options[0].description.as_deref(),
        Some("Certified minority business")
    );

    let mask = spec.encode_selection(&["Hub Zone", "Minority Owned", "Unknown"]);
    assert_eq!(mask, 9);
    let labels: Vec<_> = spec
        .decode_selection(mask)
        .into_iter()
        .map(|option| option.label.as_str())
        .collect();
    assert_eq!(labels, ["Minority Owned", "Hub Zone"]);
}

#[test]
fn multi_select_with_bad_bit_falls_back() {
    assert!(ResponseSpec::try_parse("List2List:Alpha|desc|nope").is_err());
    assert_eq!(
        ResponseSpec::parse("List2List:Alpha|desc|40").kind,
        ResponseKind::Text
    );
}

#[test]
fn multi_select_drops_only_the_bad_segment() {
    let encoded = "List2List:Alpha|a|0;Beta|b|99;Gamma|c|2";
    let spec = ResponseSpec::parse(encoded);
    assert_eq!(spec.kind, ResponseKind::MultiSelectBitmask);
    let labels: Vec<_> = spec.options.iter().map(|option| option.label.as_str()).collect();
    assert_eq!(labels, ["Alpha", "Gamma"]);

    let (partial, dropped) = ResponseSpec::try_parse_partial(encoded).expect("usable options");
    assert_eq!(partial, spec);
    assert_eq!(dropped.len(), 1);
    assert!(dropped[0].to_string().contains("Beta|b|99"));

    assert!(ResponseSpec::try_parse(encoded).is_err());
}

#[test]
fn canonical_rendering_parses_back() {
    for encoded in [
        "DROPDOWN:Level 1(AA);Level 2(AB);Level 3(AC)",
        "LIST:Yes(Y);No(N)",
        "List2List:Alpha|first|0;Beta||5",
        "TEXT_NUMBER_9",
        "Y/N/NA",
    ] {
        let spec = ResponseSpec::parse(encoded);
        assert_eq!(spec.to_string(), encoded);
        assert_eq!(ResponseSpec::parse(&spec.to_string()), spec);
    }
}
