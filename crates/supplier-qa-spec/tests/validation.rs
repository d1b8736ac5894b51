use supplier_qa_spec::{
    Answer, AnswerMap, CompiledQuestion, ErrorKind, Qid, Question, Questionnaire, validate,
    validate_question, validation_map,
};

fn registration_number() -> CompiledQuestion {
    CompiledQuestion::compile(
        Question::new("2001", "Registration number", "TEXT_NUMBER_6").required(),
    )
}

fn answers(pairs: &[(&str, Answer)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(qid, answer)| (Qid::from(*qid), answer.clone()))
        .collect()
}

#[test]
fn fixed_length_reports_expected_and_actual() {
    let question = registration_number();
    let error = validate_question(&question, Some(&Answer::text("12345")), true)
        .expect("five digits should fail");
    assert_eq!(
        error.kind,
        ErrorKind::LengthMismatch {
            expected: 6,
            actual: 5
        }
    );
    assert!(error.message.contains('6'));
    assert!(error.message.contains('5'));
    assert_eq!(error.kind.code(), "LENGTH_MISMATCH");

    assert_eq!(
        validate_question(&question, Some(&Answer::text("123456")), true),
        None
    );
    assert_eq!(
        validate_question(&question, Some(&Answer::Integer(123456)), true),
        None
    );
}

#[test]
fn required_and_empty_is_missing() {
    let question = registration_number();
    for answer in [None, Some(Answer::Empty), Some(Answer::text("  "))] {
        let error = validate_question(&question, answer.as_ref(), true).expect("missing");
        assert_eq!(error.kind, ErrorKind::RequiredMissing);
    }
}

#[test]
fn unreachable_question_is_never_in_error() {
    let question = registration_number();
    assert_eq!(validate_question(&question, None, false), None);
    assert_eq!(
        validate_question(&question, Some(&Answer::text("1")), false),
        None
    );
}

#[test]
fn optional_empty_question_is_valid() {
    let question = CompiledQuestion::compile(Question::new("9", "Notes", "TEXT"));
    assert_eq!(validate_question(&question, None, true), None);
}

#[test]
fn form_validation_skips_hidden_required_questions() {
    let form = Questionnaire::new(vec![
        Question::new("1", "Certified?", "Y/N")
            .required()
            .with_skip("0", "3"),
        Question::new("2", "Certificate number", "TEXT_NUMBER_6").required(),
        Question::new("3", "Contact", "TEXT").required(),
    ]);

    let result = validate(&form, &answers(&[("1", Answer::text("Y"))]));
    assert!(!result.valid);
    assert_eq!(result.missing_required, vec![Qid::from("2"), Qid::from("3")]);

    let result = validate(&form, &answers(&[("1", Answer::text("N"))]));
    assert_eq!(result.missing_required, vec![Qid::from("3")]);

    let result = validate(
        &form,
        &answers(&[
            ("1", Answer::text("N")),
            ("3", Answer::text("jane@supplier.test")),
            ("77", Answer::text("stale")),
        ]),
    );
    assert!(result.valid);
    assert_eq!(result.unknown_fields, vec![Qid::from("77")]);
}

#[test]
fn validation_map_lists_every_question() {
    let form = Questionnaire::new(vec![
        Question::new("1", "Certificate number", "TEXT_NUMBER_6").required(),
        Question::new("2", "Notes", "TEXT"),
    ]);
    let result = validate(&form, &answers(&[("1", Answer::text("1234567"))]));
    let map = validation_map(&form, &result);
    assert_eq!(map.len(), 2);
    assert_eq!(
        map[&Qid::from("1")],
        Some(ErrorKind::LengthMismatch {
            expected: 6,
            actual: 7
        })
    );
    assert_eq!(map[&Qid::from("2")], None);
}
