//! Types and functions related to parsing the input from our proc-macro.

use core::ops::RangeInclusive;
use darling::FromMeta;
use syn::spanned::Spanned;
use syn::{Field, Ident, Result, Type};

/// Minimum value of a protobuf tag.
const MINIMUM_TAG_VAL: u32 = 1;
/// Maximum value of a protobuf tag.
const MAXIMUM_TAG_VAL: u32 = (1 << 29) - 1;
/// Range of tag values that is reserved by Google.
const RESERVED_TAG_RANGE: RangeInclusive<u32> = 19000..=19999;

/// Words the proto2 grammar reserves for wire/scalar types and keywords.
///
/// Kept in sync with `protodsl::schema::RESERVED_WORDS` by hand: this crate
/// can't depend on `protodsl` (it would be a cycle, since `protodsl` depends
/// on this crate for its derive macros), so the list is duplicated here for
/// compile-time field-name validation.
const RESERVED_WORDS: &[&str] = &[
    "int32", "int64", "sint32", "sint64", "uint32", "uint64", "bool", "fixed32", "fixed64",
    "sfixed32", "sfixed64", "float", "double", "string", "bytes", "message", "optional",
    "repeated", "group",
];

/// Errors if `name` collides with a reserved proto2 keyword.
pub fn validate_not_reserved(name: &Ident, span: proc_macro2::Span) -> Result<()> {
    let name_str = name.to_string();
    if RESERVED_WORDS.contains(&name_str.as_str()) {
        return Err(syn::Error::new(
            span,
            format!("'{name_str}' is a reserved proto2 keyword and can't be used as a field name"),
        ));
    }
    Ok(())
}

/// Metadata for a single field annotated with `#[proto(...)]`.
pub struct FieldMetadata<'a> {
    /// Name of the field.
    pub name: &'a Ident,
    /// Type of the field.
    pub ty: &'a Type,
    /// The kind of field parsed from `#[proto(...)]` attributes.
    pub kind: FieldKind,
    /// Whether this field's value type is a `#[derive(ProtoMessage)]` type.
    ///
    /// Message values never implement `ProtoDecode`/`ProtoEncode` (see
    /// `codec::message`), so they're routed through the cache-aware
    /// `decode_message_field`/`encode_message_field`/`encoded_message_field_len`
    /// helpers instead of the generic scalar path.
    pub is_message: bool,
    /// proto2 `[default = "..."]` literal, as written in the attribute.
    pub default: Option<String>,
    /// Explicit `.proto` schema type name override (`#[proto(ty = "sint32")]`),
    /// for field types [`schema_type_name`] can't infer (a map's key/value
    /// types narrowed to a non-default wrapper, for instance).
    pub ty_override: Option<String>,
    /// Path to a `#[proto(validate = "path::to::fn")]` validator, run on the
    /// decoded value after the read loop completes. For a oneof field this
    /// validates the field itself, never an individual alternative.
    pub validate: Option<String>,
}

/// Maps a Rust identifier used as a field's (or a container's generic
/// argument's) leaf type to the `.proto` token it corresponds to.
///
/// Anything not in this table is assumed to be the name of another
/// `#[derive(ProtoMessage)]` type, passed through verbatim — by convention
/// the Rust struct name doubles as the proto message name.
fn scalar_proto_token(rust_ident: &str) -> &str {
    match rust_ident {
        "i32" => "int32",
        "i64" => "int64",
        "u32" => "uint32",
        "u64" => "uint64",
        "bool" => "bool",
        "f32" => "float",
        "f64" => "double",
        "Sint32" => "sint32",
        "Sint64" => "sint64",
        "Fixed32" => "fixed32",
        "Fixed64" => "fixed64",
        "Sfixed32" => "sfixed32",
        "Sfixed64" => "sfixed64",
        "ProtoString" | "String" | "str" => "string",
        "ProtoBytes" => "bytes",
        other => other,
    }
}

/// Innermost path segment identifier of a type, unwrapping at most one level
/// of `Option<T>`/`Box<T>`/`Vec<T>` (but not both — callers that need to
/// unwrap `Vec<u8>` inside a `Vec` should pass the already-unwrapped type).
fn leaf_ident(ty: &Type) -> Option<String> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let ident = segment.ident.to_string();
    if matches!(ident.as_str(), "Option" | "Box" | "Vec" | "Repeated")
        && !matches!(&segment.arguments, syn::PathArguments::None)
    {
        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                return leaf_ident(inner);
            }
        }
    }
    Some(ident)
}

/// Infer the `.proto` schema type name for a non-message field's Rust type,
/// unwrapping `Option<T>`/`Vec<T>` wrappers first. Returns `None` if the type
/// isn't a simple path (callers fall back to an explicit `ty_override`).
pub fn schema_type_name(ty: &Type) -> Option<String> {
    leaf_ident(ty).map(|ident| scalar_proto_token(&ident).to_string())
}

/// Extract the two generic arguments `(K, V)` of a map container type, e.g.
/// `BTreeMap<K, V>` or `HashMap<K, V>`.
pub fn extract_map_kv_types(ty: &Type) -> Option<(&Type, &Type)> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|a| match a {
        syn::GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    let key = types.next()?;
    let value = types.next()?;
    Some((key, value))
}

/// The protobuf kind/type of field within a struct.
pub enum FieldKind {
    /// proto2 `optional` field with an implicit or literal default: if not
    /// present on the wire, decodes to that default; omitted from the wire
    /// when the in-memory value equals it.
    Singular { tag: u32 },
    /// proto2 `required` field: absent from the wire is a decode error
    /// (`required_field_missing`), always emitted on write.
    Required { tag: u32 },
    /// Optional field, if not present will deserialize to `None`.
    Optional { tag: u32 },
    /// Repeated field, if not present will deserialize to an empty set.
    Repeated { tag: u32 },
    /// Map field, essentially a `repeated` field but with (key, value).
    Map { tag: u32 },
    /// Oneof field.
    Oneof {
        /// Tag values that make up this `oneof`.
        tags: Vec<u32>,
        /// Will fail deserialization if a tag from the oneof is not present.
        required: bool,
    },
}

impl FieldKind {
    /// Returns all of the tag values this field is annotated with.
    pub fn all_tags(&self) -> impl Iterator<Item = &u32> {
        let iter: Box<dyn Iterator<Item = &u32>> = match self {
            FieldKind::Singular { tag }
            | FieldKind::Required { tag }
            | FieldKind::Optional { tag }
            | FieldKind::Repeated { tag }
            | FieldKind::Map { tag } => Box::new(std::iter::once(tag)),
            FieldKind::Oneof { tags, .. } => Box::new(tags.iter()),
        };
        iter
    }

    /// Returns the single tag for non-oneof fields.
    pub fn tag(&self) -> Option<u32> {
        match self {
            FieldKind::Singular { tag }
            | FieldKind::Required { tag }
            | FieldKind::Optional { tag }
            | FieldKind::Repeated { tag }
            | FieldKind::Map { tag } => Some(*tag),
            _ => None,
        }
    }

    pub fn as_oneof(&self) -> Option<(&[u32], bool)> {
        match self {
            FieldKind::Oneof { tags, required } => Some((tags, *required)),
            _ => None,
        }
    }
}

/// Raw attributes parsed from `#[proto(...)]` on a field.
///
/// We parse these and then transform them into a [`FieldKind`] with [`parse_field_metadata`].
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct RawProtoFieldAttrs {
    tag: Option<u32>,
    repeated: bool,
    optional: bool,
    map: bool,
    oneof: bool,
    tags: Option<String>,
    required: bool,
    message: bool,
    default: Option<String>,
    ty: Option<String>,
    validate: Option<String>,
}

/// Parse `#[proto(...)]` attributes from a [`Field`], validates them, and returns
/// a complete [`FieldMetadata`].
pub fn parse_field_metadata(field: &Field) -> Result<FieldMetadata<'_>> {
    // Parse the `#[proto(...)]` attribute.
    let raw = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("proto"))
        .map(|attr| RawProtoFieldAttrs::from_meta(&attr.meta))
        .transpose()
        .map_err(|e| syn::Error::new_spanned(field, e.to_string()))?
        .unwrap_or_default();

    // 'required' only makes sense paired with a oneof, or alone on a bare
    // (non-map/repeated/optional) field.
    if raw.required && raw.oneof && (raw.map || raw.repeated || raw.optional) {
        return Err(syn::Error::new_spanned(
            field,
            "'required' cannot be combined with map/repeated/optional",
        ));
    }

    if raw.message && raw.map {
        return Err(syn::Error::new_spanned(
            field,
            "message-valued map fields are not supported",
        ));
    }

    if raw.message && raw.oneof {
        return Err(syn::Error::new_spanned(
            field,
            "'message' is set per-variant on the #[derive(ProtoOneof)] enum, not on the oneof field itself",
        ));
    }

    if raw.default.is_some() && (raw.message || raw.map || raw.repeated || raw.oneof) {
        return Err(syn::Error::new_spanned(
            field,
            "'default' only applies to a singular scalar field",
        ));
    }

    validate_not_reserved(field.ident.as_ref().unwrap(), field.span())?;

    // Determine the field kind.
    let kind = match (raw.oneof, raw.map, raw.repeated, raw.optional) {
        (true, false, false, false) => {
            let Some(tags_str) = raw.tags else {
                return Err(syn::Error::new_spanned(
                    field,
                    "oneof field requires tags = \"1, 2, 3\" attribute",
                ));
            };
            let tags = tags_str
                .split(',')
                .map(|s| {
                    let parsed_tag = s
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| syn::Error::new_spanned(field, "invalid tag in tags list"))?;
                    validate_tag(parsed_tag, field.span())?;
                    Ok(parsed_tag)
                })
                .collect::<Result<Vec<u32>>>()?;
            FieldKind::Oneof {
                tags,
                required: raw.required,
            }
        }
        (false, map @ true, repeated @ false, optional @ false)
        | (false, map @ false, repeated @ true, optional @ false)
        | (false, map @ false, repeated @ false, optional @ true)
        | (false, map @ false, repeated @ false, optional @ false) => {
            let tag = raw.tag.ok_or_else(|| {
                syn::Error::new_spanned(field, "missing #[proto(tag = N)] attribute")
            })?;
            validate_tag(tag, field.span())?;

            // Only one of the values should be set, or none.
            assert!(map ^ repeated ^ optional ^ (!map && !repeated && !optional));
            if map {
                FieldKind::Map { tag }
            } else if repeated {
                FieldKind::Repeated { tag }
            } else if optional {
                FieldKind::Optional { tag }
            } else if raw.required {
                FieldKind::Required { tag }
            } else {
                FieldKind::Singular { tag }
            }
        }
        // All other combinations are invalid - multiple flags set
        _ => {
            return Err(syn::Error::new_spanned(
                field,
                "conflicting field attributes",
            ));
        }
    };

    Ok(FieldMetadata {
        name: field.ident.as_ref().unwrap(),
        ty: &field.ty,
        kind,
        is_message: raw.message,
        default: raw.default,
        ty_override: raw.ty,
        validate: raw.validate,
    })
}

/// Validates that a tag number is within the valid Protocol Buffers range.
pub fn validate_tag(tag: u32, span: proc_macro2::Span) -> Result<()> {
    if !(MINIMUM_TAG_VAL..=MAXIMUM_TAG_VAL).contains(&tag) || RESERVED_TAG_RANGE.contains(&tag) {
        let msg = format!(
            "Tag number '{}' is invalid. Valid tag numbers are in the range [{}, {}], excluding [{}, {}]",
            tag,
            MINIMUM_TAG_VAL,
            MAXIMUM_TAG_VAL,
            RESERVED_TAG_RANGE.start(),
            RESERVED_TAG_RANGE.end(),
        );
        return Err(syn::Error::new(span, msg));
    }

    Ok(())
}

/// Extract `T` from `Option<T>`. `None` if `ty` isn't an `Option`.
pub fn extract_option_inner_type(ty: &Type) -> Option<&Type> {
    extract_single_generic_arg(ty, "Option")
}

/// Extract `T` from `Vec<T>`. `None` if `ty` isn't a `Vec` (e.g. it's `Repeated<T>`).
pub fn extract_vec_inner_type(ty: &Type) -> Option<&Type> {
    extract_single_generic_arg(ty, "Vec")
}

/// Extract `T` from `Box<T>`. `None` if `ty` isn't boxed.
pub fn extract_box_inner_type(ty: &Type) -> Option<&Type> {
    extract_single_generic_arg(ty, "Box")
}

fn extract_single_generic_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
