use apiblueprint_engine::{
    DiagnosticCode, ParseOptions, ParseResult, ast::Blueprint, parse_blueprint, wrap_blueprint,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.apib",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn parse_fixture(name: &str) -> ParseResult<Blueprint> {
    parse_blueprint(&load_fixture(name), &ParseOptions::default())
}

fn serialize(blueprint: &Blueprint) -> Value {
    serde_json::to_value(wrap_blueprint(blueprint)).unwrap()
}

fn at<'a>(json: &'a Value, pointer: &str) -> &'a Value {
    json.pointer(pointer)
        .unwrap_or_else(|| panic!("nothing at {pointer} in {json:#}"))
}

#[test]
fn notes_document_header() {
    let result = parse_fixture("notes");
    assert!(result.report.errors.is_empty(), "{:?}", result.report.errors);

    let json = serialize(&result.node);
    assert_eq!(at(&json, "/ASTVersion"), "2.1");
    assert_eq!(
        at(&json, "/Metadata"),
        &json!([
            { "Name": "FORMAT", "Value": "1A" },
            { "Name": "HOST", "Value": "https://notes.example.com" }
        ])
    );
    assert_eq!(at(&json, "/Name"), "Notes API");
    assert_eq!(at(&json, "/Description"), "A small API for notes.");
    assert_eq!(at(&json, "/ResourceGroups/0/Name"), "Notes");
    assert_eq!(
        at(&json, "/ResourceGroups/0/Description"),
        "Notes are short texts."
    );
}

#[test]
fn notes_resource_model_and_reference() {
    let json = serialize(&parse_fixture("notes").node);
    let note = at(&json, "/ResourceGroups/0/Resources/0");

    assert_eq!(at(note, "/Element"), "resource");
    assert_eq!(at(note, "/URITemplate"), "/notes/{id}");
    assert_eq!(at(note, "/Model/Name"), "Note");
    assert_eq!(
        at(note, "/Model/Headers"),
        &json!([
            { "Name": "Content-Type", "Value": "application/json" },
            { "Name": "ETag", "Value": "\"abc\"" }
        ])
    );
    assert_eq!(
        at(note, "/Model/Body"),
        "{ \"id\": 42, \"title\": \"Milk\" }\n"
    );
    assert_eq!(
        at(note, "/Parameters/0"),
        &json!({
            "Name": "id",
            "Description": "Note id",
            "Type": "number",
            "Required": true,
            "Default": "",
            "Example": "42",
            "Values": []
        })
    );

    let retrieve = at(note, "/Actions/0");
    assert_eq!(at(retrieve, "/Method"), "GET");
    assert_eq!(
        at(retrieve, "/Examples/0/Responses/0/Reference"),
        &json!({ "Id": "Note" })
    );
}

#[test]
fn notes_request_assets_and_attributes() {
    let json = serialize(&parse_fixture("notes").node);
    let update = at(&json, "/ResourceGroups/0/Resources/0/Actions/1");

    assert_eq!(at(update, "/Method"), "PATCH");
    assert_eq!(at(update, "/Content/0/Element"), "dataStructure");
    assert_eq!(
        at(update, "/Content/0/TypeDefinition/TypeSpecification/Name"),
        &json!({ "Literal": "Note", "Variable": false })
    );

    let request = at(update, "/Examples/0/Requests/0");
    assert_eq!(at(request, "/Body"), "{ \"title\": \"Bread\" }\n");
    assert_eq!(at(request, "/Schema"), "{ \"type\": \"object\" }\n");
    assert_eq!(at(request, "/Content/0/Attributes/Role"), "bodyExample");
    assert_eq!(at(request, "/Content/1/Attributes/Role"), "bodySchema");
    assert_eq!(at(update, "/Examples/0/Responses/0/Name"), "204");
}

#[test]
fn notes_collection_parameters_and_typed_attributes() {
    let json = serialize(&parse_fixture("notes").node);
    let collection = at(&json, "/ResourceGroups/0/Resources/1");

    assert_eq!(at(collection, "/Parameters/0/Name"), "limit");
    assert_eq!(at(collection, "/Parameters/0/Required"), false);
    assert_eq!(at(collection, "/Parameters/0/Default"), "20");

    let attributes = at(
        collection,
        "/Actions/0/Examples/0/Responses/0/Content/0/TypeDefinition/TypeSpecification",
    );
    assert_eq!(
        attributes,
        &json!({
            "Name": "array",
            "NestedTypes": [{ "Literal": "Note", "Variable": false }]
        })
    );
}

#[test]
fn notes_data_structures() {
    let json = serialize(&parse_fixture("notes").node);
    let group = at(&json, "/Content/1");
    assert_eq!(at(group, "/Element"), "category");

    let note = at(group, "/Content/0");
    assert_eq!(at(note, "/Element"), "dataStructure");
    assert_eq!(at(note, "/Name/Literal"), "Note");
    assert_eq!(at(note, "/TypeDefinition/TypeSpecification/Name"), "object");
    assert_eq!(at(note, "/Sections/0/Class"), "memberType");

    let members = at(note, "/Sections/0/Content");
    let classes: Vec<_> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|member| member["Class"].as_str().unwrap())
        .collect();
    assert_eq!(classes, vec!["property", "property", "property", "mixin"]);

    assert_eq!(
        at(members, "/0/Content/ValueDefinition"),
        &json!({
            "Values": [{ "Literal": "42", "Variable": false }],
            "TypeDefinition": {
                "TypeSpecification": { "Name": "number", "NestedTypes": [] },
                "Attributes": ["required"]
            }
        })
    );
    assert_eq!(at(members, "/1/Content/Description"), "The note text");
    assert_eq!(
        at(members, "/3/Content/TypeSpecification/Name/Literal"),
        "Timestamps"
    );

    let timestamps = at(group, "/Content/1");
    assert_eq!(at(timestamps, "/Name/Literal"), "Timestamps");
    let one_of = at(timestamps, "/Sections/0/Content/1");
    assert_eq!(at(one_of, "/Class"), "oneOf");
    assert_eq!(one_of["Content"].as_array().unwrap().len(), 2);
    assert_eq!(
        at(one_of, "/Content/1/Content/Name/Literal"),
        "never_updated"
    );
}

#[test]
fn warnings_are_reported_in_document_order() {
    let result = parse_fixture("warnings");
    assert!(result.report.errors.is_empty());
    assert_eq!(
        result.report.warning_codes(),
        vec![
            DiagnosticCode::Format,
            DiagnosticCode::Redefinition,
            DiagnosticCode::MissingResponse,
            DiagnosticCode::Logical,
        ]
    );

    let json = serialize(&result.node);
    let responses = at(
        &json,
        "/ResourceGroups/0/Resources/0/Actions/0/Examples/0/Responses",
    );
    assert_eq!(at(responses, "/0/Name"), "200");
    assert_eq!(at(responses, "/1/Body"), "two\n");
}

#[test]
fn warnings_point_into_the_source() {
    let source = load_fixture("warnings");
    let result = parse_blueprint(&source, &ParseOptions::default());
    let logical = result
        .report
        .warnings
        .iter()
        .find(|warning| warning.code == DiagnosticCode::Logical)
        .unwrap();
    let text = logical.source_map.slice(&source).unwrap();
    assert!(text.contains("page (number)"), "{text:?}");
}

#[test]
fn serialization_is_deterministic() {
    let result = parse_fixture("notes");
    let first = serde_json::to_string(&wrap_blueprint(&result.node)).unwrap();
    let second = serde_json::to_string(&wrap_blueprint(&result.node)).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with(r#"{"ASTVersion":"2.1","Metadata":"#));
}
