use crate::bridge;
use crate::error::ErrorKind;
use crate::parser;
use crate::scalar;
use crate::tree::{Entry, Node, Scalar};
use crate::writer;
use crate::xml::{self, XmlElement};

const PARSE_ERROR_FIXTURES: &str = include_str!("../test-data/fixtures/parse-errors.json");

/// The worked example from the format documentation.
const PROJECT: &str = "\
$begin 'project'
    version=1
    active=True
    component('motor', 10)
    offsets[2: 15, 30]
    $begin 'subsystem'
        name='control'
    $end 'subsystem'
$end 'project'
";

fn project_node() -> Node {
    let mut root = Node::new("project");
    root.set_attr("version", Scalar::Int(1));
    root.set_attr("active", Scalar::Bool(true));
    root.push_entry(Entry::Call {
        name: "component".to_string(),
        args: vec![Scalar::String("motor".to_string()), Scalar::Int(10)],
    });
    root.push_entry(Entry::List {
        name: "offsets".to_string(),
        count: 2,
        values: vec![Scalar::Int(15), Scalar::Int(30)],
    });
    let mut sub = Node::new("subsystem");
    sub.set_attr("name", Scalar::String("control".to_string()));
    root.push_child(sub);
    root
}

// ── Scalar codecs ───────────────────────────────────────────────────

#[test]
fn native_scalar_round_trip() {
    let scalars = [
        Scalar::Bool(true),
        Scalar::Bool(false),
        Scalar::Int(0),
        Scalar::Int(-5),
        Scalar::Float(3.14),
        Scalar::String("text".to_string()),
    ];
    for value in &scalars {
        let formatted = scalar::format_native(value);
        assert_eq!(
            &scalar::parse_native(&formatted),
            value,
            "round trip failed for {:?} (formatted {:?})",
            value,
            formatted
        );
    }
}

#[test]
fn bare_string_becomes_quoted_after_one_round_trip() {
    // A bare token carries no marker distinguishing it from a quoted
    // string, so formatting quotes it. After that it is stable.
    let parsed = scalar::parse_native("motor");
    assert_eq!(parsed, Scalar::String("motor".to_string()));
    assert_eq!(scalar::format_native(&parsed), "'motor'");
    assert_eq!(scalar::parse_native("'motor'"), parsed);
}

#[test]
fn native_scalar_detection() {
    assert_eq!(scalar::parse_native("TRUE"), Scalar::Bool(true));
    assert_eq!(scalar::parse_native("False"), Scalar::Bool(false));
    assert_eq!(scalar::parse_native(" 42 "), Scalar::Int(42));
    assert_eq!(scalar::parse_native("-5"), Scalar::Int(-5));
    assert_eq!(scalar::parse_native("-0.5"), Scalar::Float(-0.5));
    assert_eq!(scalar::parse_native("'x y'"), Scalar::String("x y".to_string()));
    // Not a recognized numeric form: stays a bare string.
    assert_eq!(scalar::parse_native("1.2.3"), Scalar::String("1.2.3".to_string()));
    assert_eq!(scalar::parse_native("1e5"), Scalar::String("1e5".to_string()));
    // Digit runs too large for i64 fall back to the string catch-all.
    assert_eq!(
        scalar::parse_native("99999999999999999999"),
        Scalar::String("99999999999999999999".to_string())
    );
}

#[test]
fn xml_attr_codec_is_an_involution() {
    let scalars = [
        Scalar::Bool(true),
        Scalar::Bool(false),
        Scalar::Int(0),
        Scalar::Int(-5),
        Scalar::Float(3.14),
        Scalar::String("text".to_string()),
    ];
    for value in &scalars {
        let formatted = scalar::format_xml_attr(value);
        assert_eq!(&scalar::parse_xml_attr(&formatted), value);
    }
}

#[test]
fn xml_attr_detection() {
    assert_eq!(scalar::parse_xml_attr("True"), Scalar::Bool(true));
    assert_eq!(scalar::parse_xml_attr("10"), Scalar::Int(10));
    assert_eq!(scalar::parse_xml_attr("3.14"), Scalar::Float(3.14));
    // Contains a dot but does not parse as a float.
    assert_eq!(
        scalar::parse_xml_attr("v1.2.3"),
        Scalar::String("v1.2.3".to_string())
    );
    assert_eq!(scalar::parse_xml_attr(""), Scalar::String(String::new()));
}

#[test]
fn whole_valued_floats_keep_their_decimal_point() {
    assert_eq!(scalar::format_native(&Scalar::Float(3.0)), "3.0");
    assert_eq!(scalar::parse_native("3.0"), Scalar::Float(3.0));
    assert_eq!(scalar::format_xml_attr(&Scalar::Float(-2.0)), "-2.0");
}

// ── Parser ──────────────────────────────────────────────────────────

#[test]
fn parse_worked_example() {
    let parsed = parser::parse(PROJECT).unwrap();
    assert!(parsed.notices.is_empty(), "notices: {:?}", parsed.notices);
    assert_eq!(parsed.root, project_node());
}

#[test]
fn write_round_trip() {
    let parsed = parser::parse(PROJECT).unwrap();
    let written = writer::write(&parsed.root);
    // `True` canonicalizes to `true`; everything else survives as-is.
    let expected = "\
$begin 'project'
    version=1
    active=true
    component('motor', 10)
    offsets[2: 15, 30]
    $begin 'subsystem'
        name='control'
    $end 'subsystem'
$end 'project'
";
    assert_eq!(written, expected);
    assert_eq!(parser::parse(&written).unwrap().root, parsed.root);
}

#[test]
fn entries_serialize_before_children() {
    let input = "\
$begin 'a'
    $begin 'b'
    $end 'b'
    item(1)
$end 'a'
";
    let parsed = parser::parse(input).unwrap();
    let written = writer::write(&parsed.root);
    let item_at = written.find("item(1)").unwrap();
    let child_at = written.find("$begin 'b'").unwrap();
    assert!(
        item_at < child_at,
        "entry should precede child block:\n{}",
        written
    );
}

#[test]
fn extra_end_marker_is_unmatched() {
    let err = parser::parse("$begin 'x'\n$end 'x'\n$end 'x'\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnmatchedEnd);
    assert_eq!(err.line, Some(3));
}

#[test]
fn missing_end_marker_is_unterminated() {
    let err = parser::parse("$begin 'x'\n    a=1\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedBlock);
    assert_eq!(err.line, Some(1));
}

#[test]
fn directive_outside_block_is_orphaned() {
    let err = parser::parse("$begin 'x'\n$end 'x'\nstray=1\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::OrphanDirective);
    assert_eq!(err.line, Some(3));
}

#[test]
fn unrecognized_line_is_reported_not_dropped() {
    let err = parser::parse("$begin 'x'\njunk\n$end 'x'\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedLine);
    assert_eq!(err.line, Some(2));
}

#[test]
fn second_top_level_block_is_rejected() {
    let err = parser::parse("$begin 'x'\n$end 'x'\n$begin 'y'\n$end 'y'\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MultipleRoots);
    assert_eq!(err.line, Some(3));
}

#[test]
fn blank_input_has_no_document() {
    let err = parser::parse("").unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyDocument);
    let err = parser::parse("\n   \n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyDocument);
}

#[test]
fn list_count_literal_is_preserved_not_enforced() {
    let input = "\
$begin 'x'
    offsets[2: 15, 30, 45]
$end 'x'
";
    let parsed = parser::parse(input).unwrap();
    assert_eq!(parsed.notices.len(), 1);
    assert_eq!(parsed.notices[0].kind, ErrorKind::CountMismatch);
    assert_eq!(parsed.notices[0].line, Some(2));

    // All three values serialize, with the declared literal in the header.
    let written = writer::write(&parsed.root);
    assert!(written.contains("offsets[2: 15, 30, 45]"), "{}", written);
}

#[test]
fn end_indent_mismatch_is_a_notice_not_an_error() {
    let input = "$begin 'x'\n    a=1\n    $end 'x'\n";
    let parsed = parser::parse(input).unwrap();
    assert_eq!(parsed.notices.len(), 1);
    assert_eq!(parsed.notices[0].kind, ErrorKind::IndentMismatch);
    assert_eq!(parsed.root.attr("a"), Some(&Scalar::Int(1)));
}

#[test]
fn empty_call_and_list_bodies() {
    let input = "\
$begin 'x'
    ping()
    empty[0:]
$end 'x'
";
    let parsed = parser::parse(input).unwrap();
    assert!(parsed.notices.is_empty(), "notices: {:?}", parsed.notices);
    assert_eq!(
        parsed.root.entries,
        vec![
            Entry::Call {
                name: "ping".to_string(),
                args: vec![],
            },
            Entry::List {
                name: "empty".to_string(),
                count: 0,
                values: vec![],
            },
        ]
    );
    // And both shapes survive a write round trip.
    let written = writer::write(&parsed.root);
    assert_eq!(parser::parse(&written).unwrap().root, parsed.root);
}

#[test]
fn duplicate_attribute_key_keeps_position_takes_last_value() {
    let input = "\
$begin 'x'
    version=1
    name='a'
    version=2
$end 'x'
";
    let parsed = parser::parse(input).unwrap();
    assert_eq!(
        parsed.root.attributes,
        vec![
            ("version".to_string(), Scalar::Int(2)),
            ("name".to_string(), Scalar::String("a".to_string())),
        ]
    );
}

#[test]
fn attribute_with_parenthesis_is_a_call_not_an_attribute() {
    // Classification priority: a line containing '(' is never an
    // attribute, even with an '=' in it.
    let input = "$begin 'x'\n    a=b('c')\n$end 'x'\n";
    let parsed = parser::parse(input).unwrap();
    assert!(parsed.root.attributes.is_empty());
    assert_eq!(
        parsed.root.entries,
        vec![Entry::Call {
            name: "a=b".to_string(),
            args: vec![Scalar::String("c".to_string())],
        }]
    );
}

// ── XML bridge ──────────────────────────────────────────────────────

#[test]
fn to_xml_shapes_entries_as_synthetic_elements() {
    let elem = bridge::to_xml(&project_node());

    assert_eq!(elem.name, "project");
    assert_eq!(
        elem.attributes,
        vec![
            ("version".to_string(), "1".to_string()),
            ("active".to_string(), "true".to_string()),
        ]
    );

    assert_eq!(elem.children.len(), 3);
    let call = &elem.children[0];
    assert_eq!(call.name, "component");
    assert_eq!(
        call.attributes,
        vec![
            ("arg0".to_string(), "motor".to_string()),
            ("arg1".to_string(), "10".to_string()),
        ]
    );

    let list = &elem.children[1];
    assert_eq!(list.name, "offsets");
    assert_eq!(list.attr("count"), Some("2"));
    assert_eq!(list.text.as_deref(), Some("15, 30"));

    // Structural children come after all entry-derived elements.
    assert_eq!(elem.children[2].name, "subsystem");
}

#[test]
fn from_xml_classifies_by_shape() {
    let elem = bridge::to_xml(&project_node());
    let import = bridge::from_xml(&elem).unwrap();
    assert!(import.notices.is_empty(), "notices: {:?}", import.notices);
    assert_eq!(import.node, project_node());
}

#[test]
fn xml_conversion_has_a_structural_fixed_point() {
    // For trees free of argN/count-shaped structural children,
    // to_xml . from_xml . to_xml == to_xml.
    let first = bridge::to_xml(&project_node());
    let import = bridge::from_xml(&first).unwrap();
    let second = bridge::to_xml(&import.node);
    assert_eq!(second, first);
}

#[test]
fn arg_shaped_structural_child_is_imported_as_an_entry() {
    // The encoding is ambiguous by design: a real nested block whose
    // only attribute is arg0 is indistinguishable from a call entry.
    // This asserts the documented lossy behavior.
    let mut root = Node::new("root");
    let mut weird = Node::new("weird");
    weird.set_attr("arg0", Scalar::Int(1));
    root.push_child(weird);

    let import = bridge::from_xml(&bridge::to_xml(&root)).unwrap();
    assert!(import.node.children.is_empty());
    assert_eq!(
        import.node.entries,
        vec![Entry::Call {
            name: "weird".to_string(),
            args: vec![Scalar::Int(1)],
        }]
    );
}

#[test]
fn call_argument_order_follows_numeric_suffix() {
    // Eleven arguments force arg10 to sort after arg9; a lexicographic
    // sort would interleave it after arg1.
    let args: Vec<Scalar> = (0..11).map(Scalar::Int).collect();
    let mut root = Node::new("root");
    root.push_entry(Entry::Call {
        name: "wide".to_string(),
        args: args.clone(),
    });

    let import = bridge::from_xml(&bridge::to_xml(&root)).unwrap();
    assert_eq!(
        import.node.entries,
        vec![Entry::Call {
            name: "wide".to_string(),
            args,
        }]
    );
}

#[test]
fn entry_classified_element_with_extra_data_raises_a_notice() {
    let mut call_like = XmlElement::new("thing");
    call_like.set_attr("arg0", "1");
    call_like.children.push(XmlElement::new("nested"));
    let mut root = XmlElement::new("root");
    root.children.push(call_like);

    let import = bridge::from_xml(&root).unwrap();
    assert_eq!(import.notices.len(), 1);
    assert_eq!(
        import.notices[0].kind,
        ErrorKind::AmbiguousClassification
    );
    // Heuristic still applies: entry kept, nested element dropped.
    assert_eq!(import.node.entries.len(), 1);
    assert!(import.node.children.is_empty());
}

#[test]
fn non_integer_list_count_is_malformed() {
    let mut list_like = XmlElement::new("vals");
    list_like.set_attr("count", "two");
    list_like.text = Some("1, 2".to_string());
    let mut root = XmlElement::new("root");
    root.children.push(list_like);

    let err = bridge::from_xml(&root).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedScalar);
}

// ── XML text layer ──────────────────────────────────────────────────

#[test]
fn xml_text_round_trip() {
    let elem = bridge::to_xml(&project_node());
    let text = xml::to_string(&elem).unwrap();
    assert!(text.starts_with("<?xml"));
    assert_eq!(xml::from_str(&text).unwrap(), elem);
}

#[test]
fn xml_text_escaping() {
    let mut elem = XmlElement::new("e");
    elem.set_attr("label", "a<b&c\"d'e");
    let mut child = XmlElement::new("t");
    child.text = Some("x < y & z".to_string());
    elem.children.push(child);

    let text = xml::to_string(&elem).unwrap();
    let back = xml::from_str(&text).unwrap();
    assert_eq!(back.attr("label"), Some("a<b&c\"d'e"));
    assert_eq!(back.children[0].text.as_deref(), Some("x < y & z"));
}

#[test]
fn xml_rejects_multiple_roots_and_garbage() {
    assert_eq!(
        xml::from_str("<a/><b/>").unwrap_err().kind,
        ErrorKind::Xml
    );
    assert_eq!(xml::from_str("").unwrap_err().kind, ErrorKind::Xml);
    assert_eq!(xml::from_str("<a>").unwrap_err().kind, ErrorKind::Xml);
}

// ── End to end ──────────────────────────────────────────────────────

#[test]
fn native_through_xml_and_back() {
    let to_xml = crate::native_to_xml(PROJECT).unwrap();
    assert!(to_xml.notices.is_empty());

    let back = crate::xml_to_native(&to_xml.output).unwrap();
    assert!(back.notices.is_empty(), "notices: {:?}", back.notices);
    assert_eq!(parser::parse(&back.output).unwrap().root, project_node());
}

// ── Fixtures ────────────────────────────────────────────────────────

#[test]
fn fixture_parse_errors() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(PARSE_ERROR_FIXTURES).unwrap();

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let input = fixture["input"].as_str().unwrap();
        let code = fixture["code"].as_str().unwrap();

        match parser::parse(input) {
            Ok(parsed) => panic!(
                "Fixture '{}': expected error '{}', got tree {:?}",
                name, code, parsed.root
            ),
            Err(err) => assert_eq!(
                err.kind.code(),
                code,
                "Fixture '{}': wrong error code ({})",
                name,
                err
            ),
        }
    }
}
