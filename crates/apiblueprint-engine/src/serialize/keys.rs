//! Key vocabulary of the serialized AST. These strings are part of the
//! output format and must not change.

pub const AST_VERSION: &str = "ASTVersion";
pub const METADATA: &str = "Metadata";
pub const REFERENCE: &str = "Reference";
pub const ID: &str = "Id";
pub const NAME: &str = "Name";
pub const DESCRIPTION: &str = "Description";
pub const ELEMENT: &str = "Element";
pub const ATTRIBUTES: &str = "Attributes";
pub const CONTENT: &str = "Content";
pub const ROLE: &str = "Role";
pub const RESOURCE_GROUPS: &str = "ResourceGroups";
pub const RESOURCES: &str = "Resources";
pub const URI_TEMPLATE: &str = "URITemplate";
pub const MODEL: &str = "Model";
pub const ACTIONS: &str = "Actions";
pub const METHOD: &str = "Method";
pub const EXAMPLES: &str = "Examples";
pub const REQUESTS: &str = "Requests";
pub const RESPONSES: &str = "Responses";
pub const HEADERS: &str = "Headers";
pub const BODY: &str = "Body";
pub const SCHEMA: &str = "Schema";
pub const VALUE: &str = "Value";
pub const PARAMETERS: &str = "Parameters";
pub const TYPE: &str = "Type";
pub const REQUIRED: &str = "Required";
pub const DEFAULT: &str = "Default";
pub const EXAMPLE: &str = "Example";
pub const VALUES: &str = "Values";
pub const LITERAL: &str = "Literal";
pub const VARIABLE: &str = "Variable";
pub const TYPE_DEFINITION: &str = "TypeDefinition";
pub const TYPE_SPECIFICATION: &str = "TypeSpecification";
pub const NESTED_TYPES: &str = "NestedTypes";
pub const VALUE_DEFINITION: &str = "ValueDefinition";
pub const SECTIONS: &str = "Sections";
pub const CLASS: &str = "Class";

/// Value of the root `ASTVersion` key.
pub const VERSION: &str = "2.1";
