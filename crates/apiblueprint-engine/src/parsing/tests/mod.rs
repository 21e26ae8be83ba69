//! End-to-end tests for the section parser.
//!
//! Every parsed blueprint is also run through the source map invariants in
//! [`invariants`].


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::ast::{Blueprint, CategoryKind, CopyText, Element, ParameterUse, PayloadKind};
use crate::markdown::MarkdownNode;
use crate::parsing::{
    Cursor, Entity, Outcome, ParseContext, ParseOptions, ParseResult, SectionType, parse,
    parse_blueprint, parse_section,
};
use crate::report::DiagnosticCode;
use crate::source_map::{SourceMap, Span};

const NOTES: &str = "\
FORMAT: 1A
HOST: https://api.example.com

# Notes API

Notes service.

# Group Notes

Group prose.

## Note [/notes/{id}]

A single note.

+ Parameters
    + id (number) - Note id

### Retrieve a Note [GET]

+ Response 200 (application/json)

      { \"id\": 1 }

### Delete a Note [DELETE]

+ Response 204
";

fn parse_checked(source: &str) -> ParseResult<Blueprint> {
    parse_checked_with(source, &ParseOptions::default())
}

fn parse_checked_with(source: &str, options: &ParseOptions) -> ParseResult<Blueprint> {
    let result = parse_blueprint(source, options);
    invariants::check(source, &result.node);
    result
}

#[test]
fn full_blueprint() {
    let result = parse_checked(NOTES);
    assert!(result.report.is_empty(), "{:?}", result.report);

    let blueprint = &result.node;
    assert_eq!(blueprint.name, "Notes API");
    assert_eq!(blueprint.description, "Notes service.");
    assert_eq!(
        blueprint
            .metadata
            .iter()
            .map(|m| (m.name.as_str(), m.value.as_str()))
            .collect::<Vec<_>>(),
        vec![("FORMAT", "1A"), ("HOST", "https://api.example.com")]
    );

    let groups: Vec<_> = blueprint.resource_groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Notes");
    assert!(matches!(&groups[0].content[0], Element::Copy(copy) if copy.text == "Group prose."));

    let resource = blueprint.resources().next().expect("resource");
    assert_eq!(resource.name, "Note");
    assert_eq!(resource.uri_template, "/notes/{id}");
    assert_eq!(resource.description, "A single note.");
    assert_eq!(resource.parameters.len(), 1);
    assert_eq!(resource.parameters[0].name, "id");
    assert_eq!(resource.parameters[0].type_name, "number");
    assert_eq!(resource.parameters[0].description, "Note id");

    let methods: Vec<_> = resource.actions.iter().map(|a| a.method.as_str()).collect();
    assert_eq!(methods, vec!["GET", "DELETE"]);
    let response = &resource.actions[0].examples[0].responses[0];
    assert_eq!(response.kind, PayloadKind::Response);
    assert_eq!(response.name, "200");
    assert_eq!(response.body.content, "{ \"id\": 1 }\n");
    assert_eq!(resource.actions[1].examples[0].responses[0].name, "204");
}

#[test]
fn top_level_resources_share_an_anonymous_group() {
    let source = "\
# API

## Notes [/notes]

### List [GET]

+ Response 200

## Tags [/tags]

### List [GET]

+ Response 200
";
    let result = parse_checked(source);
    let groups: Vec<_> = result.node.resource_groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "");
    assert_eq!(result.node.resources().count(), 2);
}

#[test]
fn group_after_top_level_resource_closes_anonymous_group() {
    let source = "\
# API

## Notes [/notes]

# Group Tags

## Tags [/tags]
";
    let result = parse_checked(source);
    let names: Vec<_> = result.node.resource_groups().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["", "Tags"]);
}

#[test]
fn action_outside_resource_is_dropped() {
    let source = "\
# API

## List notes [GET]

+ Response 200

## Notes [/notes]
";
    let result = parse_checked(source);
    assert_eq!(result.report.errors.len(), 1);
    assert_eq!(result.report.errors[0].code, DiagnosticCode::Logical);
    assert_eq!(result.node.name, "API");
    let resources: Vec<_> = result.node.resources().collect();
    assert_eq!(resources.len(), 1);
    assert!(resources[0].actions.is_empty());
}

#[test]
fn nesting_past_limit_aborts_the_parse() {
    let options = ParseOptions {
        max_nesting_depth: 2,
        ..ParseOptions::default()
    };
    let result = parse_checked_with(NOTES, &options);
    assert_eq!(result.node, Blueprint::default());
    assert_eq!(result.report.errors.len(), 1);
    assert_eq!(result.report.errors[0].code, DiagnosticCode::NestingDepth);
}

#[test]
fn missing_name_warns() {
    let result = parse_checked("Just prose.\n");
    assert_eq!(result.node.name, "");
    assert_eq!(result.node.description, "Just prose.");
    assert_eq!(result.report.warning_codes(), vec![DiagnosticCode::Format]);
}

#[test]
fn empty_document_is_an_empty_blueprint() {
    let result = parse_checked("");
    assert!(result.node.content.is_empty());
    assert!(result.report.errors.is_empty());
}

#[test]
fn method_and_uri_header_declares_resource_and_action() {
    let source = "\
# API

## GET /notes

Lists notes.

+ Response 200
";
    let result = parse_checked(source);
    let resource = result.node.resources().next().expect("resource");
    assert_eq!(resource.uri_template, "/notes");
    assert_eq!(resource.actions.len(), 1);
    assert_eq!(resource.actions[0].method, "GET");
    assert_eq!(resource.actions[0].description, "Lists notes.");
}

#[test]
fn request_after_response_opens_new_example() {
    let source = "\
# API

## Notes [/notes]

### Create [POST]

+ Request A

+ Response 201

+ Request B

+ Response 400
";
    let result = parse_checked(source);
    let action = &result.node.resources().next().expect("resource").actions[0];
    assert_eq!(action.examples.len(), 2);
    assert_eq!(action.examples[0].requests[0].name, "A");
    assert_eq!(action.examples[1].requests[0].name, "B");
    assert_eq!(action.examples[1].responses[0].name, "400");
}

#[test]
fn action_without_response_warns() {
    let source = "# API\n\n## Notes [/notes]\n\n### List [GET]\n";
    let result = parse_checked(source);
    assert_eq!(
        result.report.warning_codes(),
        vec![DiagnosticCode::MissingResponse]
    );
}

#[test]
fn unrecognized_item_after_response_joins_action_description() {
    let source = "# API\n\n## Notes [/notes]\n\n### List [GET]\n\n+ Response 200\n\n+ Foo bar\n";
    let result = parse_checked(source);
    let action = &result.node.resources().next().expect("resource").actions[0];
    assert!(action.description.contains("Foo bar"), "{:?}", action.description);
    assert_eq!(action.examples[0].responses.len(), 1);
    assert_eq!(
        result.report.warning_codes(),
        vec![DiagnosticCode::Ignoring]
    );

    let json = serde_json::to_string(&crate::serialize::wrap_blueprint(&result.node)).unwrap();
    assert!(json.contains("Foo bar"));
}

#[rstest]
#[case("Body")]
#[case("body")]
#[case("BODY  ")]
fn body_keyword_is_case_insensitive(#[case] keyword: &str) {
    let source = format!(
        "# API\n\n## Notes [/notes]\n\n### List [GET]\n\n+ Response 200\n\n    + {keyword}\n\n          Hello\n"
    );
    let result = parse_checked(&source);
    let response = &result.node.resources().next().expect("resource").actions[0].examples[0]
        .responses[0];
    assert_eq!(response.body.content, "Hello\n");
}

#[test]
fn parameter_checks() {
    let source = "\
# API

## Notes [/notes{?limit}]

+ Parameters
    + limit: `5` (number, required) - Page size
        + Default: `10`
        + Values
            + `10`
            + `20`
    + sort (optional)

### List [GET]

+ Response 200
";
    let result = parse_checked(source);
    let resource = result.node.resources().next().expect("resource");
    let limit = &resource.parameters[0];
    assert_eq!(limit.usage, ParameterUse::Required);
    assert_eq!(limit.default_value, "10");
    assert_eq!(limit.example_value, "5");
    assert_eq!(limit.values, vec!["10".to_string(), "20".to_string()]);
    assert_eq!(resource.parameters[1].usage, ParameterUse::Optional);

    assert_eq!(
        result.report.warning_codes(),
        vec![
            DiagnosticCode::Parameter,
            DiagnosticCode::Parameter,
            DiagnosticCode::Logical
        ]
    );
}

#[test]
fn malformed_parameter_is_dropped() {
    let source = "\
# API

## Notes [/notes/{id}]

+ Parameters
    + (number)
    + id (number)
";
    let result = parse_checked(source);
    assert_eq!(result.report.errors.len(), 1);
    assert_eq!(result.report.errors[0].code, DiagnosticCode::Parameter);
    let resource = result.node.resources().next().expect("resource");
    let names: Vec<_> = resource.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id"]);
}

#[test]
fn data_structures_group() {
    let source = "\
# API

# Data Structures

## Note (object)

A note.

+ id: 1 (number, required)
+ title (string)
";
    let result = parse_checked(source);
    let Some(Element::Category(group)) = result.node.content.first() else {
        panic!("expected a category, got {:?}", result.node.content);
    };
    assert_eq!(group.kind, CategoryKind::DataStructures);
    let Some(Element::DataStructure(note)) = group.content.first() else {
        panic!("expected a data structure, got {:?}", group.content);
    };
    assert_eq!(note.name, crate::ast::mson::TypeName::symbol("Note"));
    assert_eq!(note.members().count(), 2);
}

#[test]
fn source_maps_are_not_exported_when_disabled() {
    let options = ParseOptions {
        export_source_maps: false,
        ..ParseOptions::default()
    };
    let result = parse_checked_with(NOTES, &options);
    assert!(result.node.source_map.is_empty());
    let resource = result.node.resources().next().expect("resource");
    assert!(resource.source_map.is_empty());
    assert!(resource.actions[0].examples[0].responses[0].body.source_map.is_empty());
}

#[test]
fn hand_built_tree_parses_without_source_text() {
    let root = MarkdownNode::root(vec![
        MarkdownNode::header(1, "API", Span::new(0, 5)),
        MarkdownNode::header(2, "Notes [/notes]", Span::new(7, 24)),
    ]);
    let result = parse("", &root, &ParseOptions::default());
    assert_eq!(result.node.name, "API");
    assert_eq!(result.node.resources().next().expect("resource").name, "Notes");
}

#[test]
fn body_section_end_to_end() {
    let nodes = vec![MarkdownNode::list_item(
        vec![
            MarkdownNode::paragraph("Body", Span::new(2, 6)),
            MarkdownNode::code("Hello", Span::new(8, 21)),
        ],
        Span::new(0, 21),
    )];
    let mut ctx = ParseContext::new("", &ParseOptions::default());
    let outcome = parse_section(SectionType::Body, Cursor::new(&nodes, 0), &mut ctx)
        .expect("not aborted");
    let Outcome::Parsed {
        entity: Entity::Asset(asset),
        source_map,
        next,
    } = outcome
    else {
        panic!("expected an asset");
    };
    assert_eq!(next, 1);
    assert_eq!(asset.content, "Hello");
    assert_eq!(source_map.spans(), &[Span::new(2, 6), Span::new(8, 21)]);
    assert_eq!(
        crate::serialize::wrap_asset(&asset),
        crate::serialize::Value::from(
            crate::serialize::Object::new()
                .with("Element", "asset")
                .with(
                    "Attributes",
                    crate::serialize::Object::new().with("Role", "bodyExample")
                )
                .with("Content", "Hello")
        )
    );
}

#[test]
#[should_panic(expected = "overlaps its preceding sibling")]
fn overlapping_siblings_break_the_invariants() {
    let copy = |start, end| {
        Element::Copy(CopyText {
            text: "copy".into(),
            source_map: SourceMap::from_spans([Span::new(start, end)]),
        })
    };
    let blueprint = Blueprint {
        content: vec![copy(0, 5), copy(3, 8)],
        ..Blueprint::default()
    };
    invariants::check("0123456789", &blueprint);
}
