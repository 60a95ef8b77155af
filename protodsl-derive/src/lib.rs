//! Derive macros for `protodsl`.
//!
//! Provides `#[derive(ProtoMessage)]` and `#[derive(ProtoOneof)]`, generating
//! the hand-written-style impls documented in `protodsl::bin::main` straight
//! from `#[proto(...)]` field/variant attributes.

use darling::FromMeta;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{DeriveInput, Fields, Ident, Result, Type, Variant};

mod support;
use support::{
    extract_box_inner_type, extract_map_kv_types, extract_option_inner_type, extract_vec_inner_type,
    parse_field_metadata, schema_type_name, validate_not_reserved, validate_tag, FieldKind, FieldMetadata,
};

/// Derive macro for implementing the `ProtoMessage` trait.
///
/// Note: you must also derive or implement `Default` for your struct — the
/// generated `decode_message` starts from `Self::default()` and only
/// overwrites fields actually present on the wire.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, ProtoMessage)]
/// pub struct Person {
///     #[proto(tag = 1, required)]
///     name: ProtoString,
///     #[proto(tag = 2)]
///     id: i32,
///     #[proto(tag = 3, optional)]
///     email: Option<ProtoString>,
///     #[proto(tag = 4, repeated, message)]
///     phones: Vec<PhoneNumber>,
/// }
/// ```
#[proc_macro_derive(ProtoMessage, attributes(proto))]
pub fn derive_proto_message(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match impl_proto_message(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_proto_message(input: &DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    validate_not_reserved(name, name.span())?;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "only named fields supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "only structs supported")),
    };

    let field_info: Vec<FieldMetadata> = fields
        .iter()
        .map(parse_field_metadata)
        .collect::<Result<Vec<_>>>()?;

    // Duplicate tags across all fields (including oneof alternatives) are a
    // wire-format ambiguity, not just a style nit.
    let mut seen_tags = std::collections::BTreeSet::new();
    for f in &field_info {
        for tag in f.kind.all_tags() {
            if !seen_tags.insert(*tag) {
                let msg = format!("duplicate tag '{tag}' (tags must be unique across all fields)");
                return Err(syn::Error::new_spanned(f.name, msg));
            }
        }
    }

    for f in &field_info {
        if !f.is_message {
            continue;
        }
        match &f.kind {
            FieldKind::Singular { .. } => {
                return Err(syn::Error::new_spanned(
                    f.name,
                    "message-typed fields need an explicit presence: mark them 'required' or 'optional'",
                ));
            }
            FieldKind::Repeated { .. } if extract_vec_inner_type(f.ty).is_none() => {
                return Err(syn::Error::new_spanned(
                    f.name,
                    "message-typed repeated fields must be `Vec<T>` — `Repeated<T>` requires T: ProtoDecode/ProtoEncode, which message types never implement",
                ));
            }
            _ => {}
        }
    }

    let decode_impl = generate_decode_message(&field_info);
    let encode_impl = generate_encode_message(&field_info);
    let len_impl = generate_encoded_message_len(&field_info);
    let msg_def_impl = generate_msg_def(name, &field_info);

    Ok(quote! {
        impl protodsl::codec::ProtoMessage for #name {
            #decode_impl
            #len_impl
            #encode_impl
            #msg_def_impl
        }
    })
}

fn parse_default_expr(raw: &str, span: proc_macro2::Span) -> Result<syn::Expr> {
    syn::parse_str::<syn::Expr>(raw).map_err(|e| {
        syn::Error::new(
            span,
            format!("'{raw}' is not a valid Rust expression for a default value: {e}"),
        )
    })
}

fn parse_validate_path(raw: &str, span: proc_macro2::Span) -> Result<syn::Path> {
    syn::parse_str::<syn::Path>(raw).map_err(|e| {
        syn::Error::new(
            span,
            format!("'{raw}' is not a valid path to a validator function: {e}"),
        )
    })
}

fn generate_decode_message(fields: &[FieldMetadata]) -> TokenStream2 {
    let default_overrides = fields.iter().filter_map(|f| {
        let default_str = f.default.as_ref()?;
        let fname = f.name;
        match parse_default_expr(default_str, fname.span()) {
            Ok(expr) => Some(quote! { dst.#fname = #expr; }),
            Err(err) => Some(err.to_compile_error()),
        }
    });

    let field_inits = fields.iter().filter_map(|f| {
        if matches!(f.kind, FieldKind::Repeated { .. }) && extract_vec_inner_type(f.ty).is_none() {
            let fname = f.name;
            let tag = f.kind.tag().unwrap();
            Some(quote! {
                protodsl::codec::ProtoRepeated::init_repeated(&mut dst.#fname, &__msg_buf, #tag);
            })
        } else {
            None
        }
    });

    let required_flags = fields.iter().filter_map(|f| {
        if matches!(f.kind, FieldKind::Required { .. }) {
            let flag = format_ident!("__{}_seen", f.name);
            Some(quote! { let mut #flag = false; })
        } else {
            None
        }
    });

    let oneof_fields: Vec<&FieldMetadata> = fields
        .iter()
        .filter(|f| f.kind.as_oneof().is_some())
        .collect();
    let (required_oneof_fields, optional_oneof_fields): (Vec<_>, Vec<_>) = oneof_fields
        .into_iter()
        .partition(|f| f.kind.as_oneof().map(|(_, req)| req).unwrap_or(false));

    let required_oneof_temps = required_oneof_fields.iter().map(|f| {
        let temp_name = format_ident!("__oneof_{}", f.name);
        let fty = f.ty;
        quote! { let mut #temp_name: Option<#fty> = None; }
    });

    let decode_arms = fields.iter().filter_map(|f| {
        if f.kind.as_oneof().is_some() {
            return None;
        }
        let fname = f.name;
        let fty = f.ty;
        let tag = f.kind.tag().unwrap();

        Some(match &f.kind {
            FieldKind::Required { .. } => {
                let flag = format_ident!("__{}_seen", fname);
                if f.is_message {
                    quote! {
                        #tag => {
                            dst.#fname = protodsl::codec::decode_message_field(&mut buf)?;
                            #flag = true;
                        }
                    }
                } else {
                    quote! {
                        #tag => {
                            <#fty as protodsl::codec::ProtoDecode>::decode_into(&mut buf, &mut dst.#fname, value_offset)?;
                            #flag = true;
                        }
                    }
                }
            }
            FieldKind::Optional { .. } => {
                if f.is_message {
                    let inner = extract_option_inner_type(fty).unwrap_or(fty);
                    if let Some(boxed) = extract_box_inner_type(inner) {
                        quote! {
                            #tag => {
                                dst.#fname = Some(Box::new(protodsl::codec::decode_message_field::<#boxed, _>(&mut buf)?));
                            }
                        }
                    } else {
                        quote! {
                            #tag => {
                                dst.#fname = Some(protodsl::codec::decode_message_field::<#inner, _>(&mut buf)?);
                            }
                        }
                    }
                } else {
                    quote! {
                        #tag => <#fty as protodsl::codec::ProtoDecode>::decode_into(&mut buf, &mut dst.#fname, value_offset)?,
                    }
                }
            }
            FieldKind::Singular { .. } => quote! {
                #tag => <#fty as protodsl::codec::ProtoDecode>::decode_into(&mut buf, &mut dst.#fname, value_offset)?,
            },
            FieldKind::Repeated { .. } => {
                if f.is_message {
                    let inner = extract_vec_inner_type(fty).expect("validated above");
                    quote! {
                        #tag => dst.#fname.push(protodsl::codec::decode_message_field::<#inner, _>(&mut buf)?),
                    }
                } else if let Some(inner) = extract_vec_inner_type(fty) {
                    quote! {
                        #tag => protodsl::codec::decode_repeated_into::<#inner, _>(wire_type, &mut buf, &mut dst.#fname, value_offset)?,
                    }
                } else {
                    // Not `Vec<T>`, so this is `Repeated<T>`: it needs
                    // `wire_type` threaded through too, to tell a packed
                    // occurrence (`Len` wrapping a non-`Len` element type)
                    // apart from a single unpacked element.
                    quote! {
                        #tag => dst.#fname.decode_occurrence(wire_type, &mut buf, value_offset)?,
                    }
                }
            }
            FieldKind::Map { .. } => quote! {
                #tag => protodsl::codec::ProtoMap::decode_entry(&mut dst.#fname, &mut buf)?,
            },
            FieldKind::Oneof { .. } => unreachable!(),
        })
    });

    let optional_oneof_decode_arms = optional_oneof_fields.iter().flat_map(|f| {
        let fname = f.name;
        let (tags, _) = f.kind.as_oneof().unwrap();
        tags.iter().map(move |tag| {
            quote! {
                #tag => {
                    protodsl::codec::decode_oneof_field(&mut dst.#fname, tag, wire_type, &mut buf, value_offset)?;
                }
            }
        })
    });

    let required_oneof_decode_arms = required_oneof_fields.iter().flat_map(|f| {
        let temp_name = format_ident!("__oneof_{}", f.name);
        let (tags, _) = f.kind.as_oneof().unwrap();
        tags.iter().map(move |tag| {
            quote! {
                #tag => {
                    protodsl::codec::decode_oneof_field(&mut #temp_name, tag, wire_type, &mut buf, value_offset)?;
                }
            }
        })
    });

    let required_field_validations = fields.iter().filter_map(|f| {
        if matches!(f.kind, FieldKind::Required { .. }) {
            let flag = format_ident!("__{}_seen", f.name);
            Some(quote! {
                if !#flag {
                    return Err(protodsl::error::DecodeError::RequiredFieldMissing);
                }
            })
        } else {
            None
        }
    });

    let required_oneof_validations = required_oneof_fields.iter().map(|f| {
        let fname = f.name;
        let temp_name = format_ident!("__oneof_{}", fname);
        quote! {
            dst.#fname = #temp_name.ok_or(protodsl::error::DecodeError::RequiredFieldMissing)?;
        }
    });

    // Run after every field (including a required oneof, which only has its
    // final value in `dst` once `required_oneof_validations` above has run)
    // is fully decoded. A oneof's individual alternatives never carry their
    // own validator — only the oneof field itself can.
    let field_validations = fields.iter().filter_map(|f| {
        let validate_str = f.validate.as_ref()?;
        let fname = f.name;
        let path = match parse_validate_path(validate_str, fname.span()) {
            Ok(path) => path,
            Err(err) => return Some(err.to_compile_error()),
        };
        Some(quote! {
            protodsl::error::ValidateOutcome::into_validate_result(#path(&dst.#fname))?;
        })
    });

    quote! {
        fn decode_message<B: bytes::Buf>(buf: &mut B) -> Result<Self, protodsl::error::DecodeError> {
            use bytes::Buf as _;
            use protodsl::wire::{decode_key, skip_field};

            // Materialize the whole message body up front: `Repeated<T>`
            // fields need a `bytes::Bytes` handle to lazily re-slice later,
            // and this is the only place that handle can come from generically.
            // O(1) when `B` is already `bytes::Bytes` (the common case for a
            // top-level decode); a real copy otherwise (e.g. nested messages
            // reached through `Take<&mut B>`).
            let __msg_buf: bytes::Bytes = buf.copy_to_bytes(buf.remaining());
            let mut buf: &[u8] = &__msg_buf[..];

            let mut dst = <Self as ::core::default::Default>::default();
            #(#default_overrides)*
            #(#field_inits)*
            #(#required_oneof_temps)*
            #(#required_flags)*

            while buf.has_remaining() {
                let key = decode_key(&mut buf)?;
                let (wire_type, tag) = key.into_parts();
                let value_offset = __msg_buf.len() - buf.remaining();
                match tag {
                    #(#decode_arms)*
                    #(#optional_oneof_decode_arms)*
                    #(#required_oneof_decode_arms)*
                    _ => skip_field(wire_type, &mut buf)?,
                }
            }

            #(#required_field_validations)*
            #(#required_oneof_validations)*
            #(#field_validations)*

            Ok(dst)
        }
    }
}

fn generate_encode_message(fields: &[FieldMetadata]) -> TokenStream2 {
    let arms = fields.iter().map(|f| generate_field_encode(f));

    quote! {
        fn encode_message<B: bytes::BufMut>(&self, buf: &mut B, cache: &mut protodsl::codec::LenCacheReader<'_>) {
            #(#arms)*
        }
    }
}

fn generate_encoded_message_len(fields: &[FieldMetadata]) -> TokenStream2 {
    let arms = fields.iter().map(|f| generate_field_len(f));

    quote! {
        fn encoded_message_len(&self, cache: &mut protodsl::codec::LenCache) -> usize {
            let mut len = 0usize;
            #(#arms)*
            len
        }
    }
}

/// Condition under which a `Singular` field is written/counted: either "not
/// the implicit zero value" or "not equal to its literal `default = ...`".
fn singular_write_condition(f: &FieldMetadata) -> (TokenStream2, Option<syn::Expr>) {
    let fname = f.name;
    let fty = f.ty;
    match &f.default {
        Some(raw) => match parse_default_expr(raw, fname.span()) {
            Ok(expr) => (quote! { self.#fname != #expr }, Some(expr)),
            Err(err) => (err.to_compile_error(), None),
        },
        None => (
            quote! { !<#fty as protodsl::codec::IsProtoDefault>::is_proto_default(&self.#fname) },
            None,
        ),
    }
}

fn generate_field_encode(f: &FieldMetadata) -> TokenStream2 {
    let fname = f.name;
    let fty = f.ty;

    match &f.kind {
        FieldKind::Required { tag } => {
            if f.is_message {
                quote! {
                    protodsl::wire::encode_key(protodsl::wire::WireType::Len, #tag, buf);
                    protodsl::codec::encode_message_field(&self.#fname, buf, cache);
                }
            } else {
                quote! {
                    protodsl::wire::encode_key(<#fty as protodsl::codec::ProtoType>::WIRE_TYPE, #tag, buf);
                    <#fty as protodsl::codec::ProtoEncode>::encode(&self.#fname, buf);
                }
            }
        }
        FieldKind::Optional { tag } => {
            if f.is_message {
                let inner = extract_option_inner_type(fty).unwrap_or(fty);
                let boxed = extract_box_inner_type(inner);
                let deref = if boxed.is_some() {
                    quote! { value.as_ref() }
                } else {
                    quote! { value }
                };
                quote! {
                    if let Some(ref value) = self.#fname {
                        protodsl::wire::encode_key(protodsl::wire::WireType::Len, #tag, buf);
                        protodsl::codec::encode_message_field(#deref, buf, cache);
                    }
                }
            } else {
                let inner = extract_option_inner_type(fty).unwrap_or(fty);
                quote! {
                    if let Some(ref value) = self.#fname {
                        protodsl::wire::encode_key(<#inner as protodsl::codec::ProtoType>::WIRE_TYPE, #tag, buf);
                        <#inner as protodsl::codec::ProtoEncode>::encode(value, buf);
                    }
                }
            }
        }
        FieldKind::Singular { tag } => {
            let (cond, _) = singular_write_condition(f);
            quote! {
                if #cond {
                    protodsl::wire::encode_key(<#fty as protodsl::codec::ProtoType>::WIRE_TYPE, #tag, buf);
                    <#fty as protodsl::codec::ProtoEncode>::encode(&self.#fname, buf);
                }
            }
        }
        FieldKind::Repeated { tag } => {
            if f.is_message {
                quote! {
                    for __v in &self.#fname {
                        protodsl::wire::encode_key(protodsl::wire::WireType::Len, #tag, buf);
                        protodsl::codec::encode_message_field(__v, buf, cache);
                    }
                }
            } else {
                quote! {
                    protodsl::codec::ProtoRepeated::encode_repeated(&self.#fname, #tag, buf);
                }
            }
        }
        FieldKind::Map { tag } => quote! {
            protodsl::codec::ProtoMap::encode_map(&self.#fname, #tag, buf);
        },
        FieldKind::Oneof { required: true, .. } => quote! {
            protodsl::codec::ProtoOneof::encode_variant(&self.#fname, buf, cache);
        },
        FieldKind::Oneof { required: false, .. } => quote! {
            protodsl::codec::encode_oneof_field(&self.#fname, buf, cache);
        },
    }
}

fn generate_field_len(f: &FieldMetadata) -> TokenStream2 {
    let fname = f.name;
    let fty = f.ty;

    match &f.kind {
        FieldKind::Required { tag } => {
            if f.is_message {
                quote! {
                    len += protodsl::wire::encoded_key_len(#tag) + protodsl::codec::encoded_message_field_len(&self.#fname, cache);
                }
            } else {
                quote! {
                    len += protodsl::wire::encoded_key_len(#tag) + <#fty as protodsl::codec::ProtoEncode>::encoded_len(&self.#fname);
                }
            }
        }
        FieldKind::Optional { tag } => {
            if f.is_message {
                let inner = extract_option_inner_type(fty).unwrap_or(fty);
                let boxed = extract_box_inner_type(inner);
                let deref = if boxed.is_some() {
                    quote! { value.as_ref() }
                } else {
                    quote! { value }
                };
                quote! {
                    if let Some(ref value) = self.#fname {
                        len += protodsl::wire::encoded_key_len(#tag) + protodsl::codec::encoded_message_field_len(#deref, cache);
                    }
                }
            } else {
                let inner = extract_option_inner_type(fty).unwrap_or(fty);
                quote! {
                    if let Some(ref value) = self.#fname {
                        len += protodsl::wire::encoded_key_len(#tag) + <#inner as protodsl::codec::ProtoEncode>::encoded_len(value);
                    }
                }
            }
        }
        FieldKind::Singular { tag } => {
            let (cond, _) = singular_write_condition(f);
            quote! {
                if #cond {
                    len += protodsl::wire::encoded_key_len(#tag) + <#fty as protodsl::codec::ProtoEncode>::encoded_len(&self.#fname);
                }
            }
        }
        FieldKind::Repeated { tag } => {
            if f.is_message {
                quote! {
                    for __v in &self.#fname {
                        len += protodsl::wire::encoded_key_len(#tag) + protodsl::codec::encoded_message_field_len(__v, cache);
                    }
                }
            } else {
                quote! {
                    len += protodsl::codec::ProtoRepeated::encoded_repeated_len(&self.#fname, #tag);
                }
            }
        }
        FieldKind::Map { tag } => quote! {
            len += protodsl::codec::ProtoMap::encoded_map_len(&self.#fname, #tag);
        },
        FieldKind::Oneof { required: true, .. } => quote! {
            len += protodsl::codec::ProtoOneof::encoded_variant_len(&self.#fname, cache);
        },
        FieldKind::Oneof { required: false, .. } => quote! {
            len += protodsl::codec::encoded_oneof_field_len(&self.#fname, cache);
        },
    }
}

/// Type name used in the `.proto` schema text for a field, preferring an
/// explicit `#[proto(ty = "...")]` override over the inferred name.
fn field_type_literal(f: &FieldMetadata) -> String {
    f.ty_override
        .clone()
        .or_else(|| schema_type_name(f.ty))
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Whether a repeated scalar/fixed field packs by default — messages,
/// strings and bytes never pack since they're length-delimited.
fn is_packable(f: &FieldMetadata, elem_ty_name: &str) -> bool {
    !f.is_message && !matches!(elem_ty_name, "string" | "bytes")
}

fn generate_field_schema_line(f: &FieldMetadata) -> TokenStream2 {
    let fname_str = f.name.to_string();

    match &f.kind {
        FieldKind::Required { tag } => {
            let ty = field_type_literal(f);
            quote! {
                __fields.push(protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Required, #ty, #fname_str, #tag, None,
                ).expect("field name validated by validate_not_reserved at derive time"));
            }
        }
        FieldKind::Optional { tag } => {
            let ty = field_type_literal(f);
            quote! {
                __fields.push(protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Optional, #ty, #fname_str, #tag, None,
                ).expect("field name validated by validate_not_reserved at derive time"));
            }
        }
        FieldKind::Singular { tag } => {
            let ty = field_type_literal(f);
            let default_tokens = match &f.default {
                Some(d) => quote! { Some(#d) },
                None => quote! { None },
            };
            quote! {
                __fields.push(protodsl::schema::singular_field_def(
                    protodsl::schema::Label::Optional, #ty, #fname_str, #tag, #default_tokens,
                ).expect("field name validated by validate_not_reserved at derive time"));
            }
        }
        FieldKind::Repeated { tag } => {
            let elem_ty_name = field_type_literal(f);
            let packed = is_packable(f, &elem_ty_name);
            quote! {
                __fields.push(
                    protodsl::schema::repeated_field_def(#elem_ty_name, #fname_str, #tag, #packed)
                        .expect("field name validated by validate_not_reserved at derive time"),
                );
            }
        }
        FieldKind::Map { tag } => {
            let (k_ty, v_ty) = extract_map_kv_types(f.ty).expect("map field type validated during parse");
            let k_name = schema_type_name(k_ty).unwrap_or_else(|| "UNKNOWN".to_string());
            let v_name = schema_type_name(v_ty).unwrap_or_else(|| "UNKNOWN".to_string());
            let map_ty = format!("map<{k_name}, {v_name}>");
            quote! {
                __fields.push(
                    protodsl::schema::map_field_def(#map_ty, #fname_str, #tag)
                        .expect("field name validated by validate_not_reserved at derive time"),
                );
            }
        }
        FieldKind::Oneof { required, .. } => {
            let fty = f.ty;
            let enum_ty = if *required {
                fty.clone()
            } else {
                extract_option_inner_type(fty).cloned().unwrap_or_else(|| fty.clone())
            };
            quote! {
                __fields.push(
                    protodsl::schema::oneof_field_def(
                        #fname_str,
                        &<#enum_ty as protodsl::codec::ProtoOneof>::oneof_schema(),
                    )
                    .expect("oneof field/alternative names validated by validate_not_reserved at derive time"),
                );
            }
        }
    }
}

fn generate_msg_def(name: &Ident, fields: &[FieldMetadata]) -> TokenStream2 {
    let name_str = name.to_string();
    let field_lines = fields.iter().map(generate_field_schema_line);

    quote! {
        #[cfg(feature = "alloc")]
        fn msg_def() -> protodsl::alloc::string::String {
            let mut __fields: protodsl::alloc::vec::Vec<protodsl::alloc::string::String> =
                protodsl::alloc::vec::Vec::new();
            #(#field_lines)*
            protodsl::schema::message_def(#name_str, &__fields)
                .expect("message type name validated by validate_not_reserved at derive time")
        }
    }
}

/// Derive macro for implementing `ProtoOneof` on an enum.
///
/// Each variant must have exactly one unnamed field and a
/// `#[proto(tag = N)]` attribute. Variants whose payload is a
/// `#[derive(ProtoMessage)]` type (bare or `Box`-wrapped) need `message` too,
/// since message types don't implement `ProtoDecode`/`ProtoEncode` (see
/// `protodsl::codec::message`) and must be routed through the cache-aware
/// free functions instead.
///
/// # Example
///
/// ```ignore
/// #[derive(ProtoOneof)]
/// pub enum Widget {
///     #[proto(tag = 1)]
///     Quux(i32),
///     #[proto(tag = 2)]
///     Bar(ProtoString),
///     #[proto(tag = 3, message)]
///     Nested(Box<SomeMessage>),
/// }
/// ```
#[proc_macro_derive(ProtoOneof, attributes(proto))]
pub fn derive_proto_oneof(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match impl_proto_oneof(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct OneofVariantInfo<'a> {
    name: &'a Ident,
    ty: &'a Type,
    tag: u32,
    is_message: bool,
}

/// Raw attributes parsed from `#[proto(...)]` on a oneof variant.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct RawProtoVariantAttrs {
    /// The protobuf tag number for this variant.
    tag: Option<u32>,
    /// Whether this variant's payload is a `#[derive(ProtoMessage)]` type.
    message: bool,
}

fn impl_proto_oneof(input: &DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    validate_not_reserved(name, name.span())?;

    let variants = match &input.data {
        syn::Data::Enum(data) => &data.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "ProtoOneof can only be derived for enums",
            ))
        }
    };

    let variant_info: Vec<OneofVariantInfo> = variants
        .iter()
        .map(parse_oneof_variant)
        .collect::<Result<Vec<_>>>()?;

    let mut seen_tags = std::collections::BTreeSet::new();
    for v in &variant_info {
        if !seen_tags.insert(v.tag) {
            let msg = format!("duplicate tag '{}' (tags must be unique across all variants)", v.tag);
            return Err(syn::Error::new_spanned(v.name, msg));
        }
    }

    let decode_variant_impl = generate_oneof_decode(name, &variant_info);
    let encode_variant_impl = generate_oneof_encode(name, &variant_info);
    let encoded_len_impl = generate_oneof_len(name, &variant_info);
    let variant_tag_impl = generate_oneof_tag(name, &variant_info);
    let variant_wire_type_impl = generate_oneof_wire_type(name, &variant_info);
    let oneof_schema_impl = generate_oneof_schema(&variant_info);

    Ok(quote! {
        impl protodsl::codec::ProtoOneof for #name {
            #decode_variant_impl
            #encode_variant_impl
            #encoded_len_impl
            #variant_tag_impl
            #variant_wire_type_impl
            #oneof_schema_impl
        }
    })
}

fn parse_oneof_variant(variant: &Variant) -> Result<OneofVariantInfo<'_>> {
    let ty = match &variant.fields {
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed.first().unwrap().ty,
        _ => {
            return Err(syn::Error::new_spanned(
                variant,
                "oneof variants must have exactly one unnamed field, e.g., `Foo(i32)`",
            ))
        }
    };

    let raw = variant
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("proto"))
        .map(|attr| RawProtoVariantAttrs::from_meta(&attr.meta))
        .transpose()
        .map_err(|e| syn::Error::new_spanned(variant, e.to_string()))?
        .unwrap_or_default();

    let tag = raw.tag.ok_or_else(|| {
        syn::Error::new_spanned(variant, "missing #[proto(tag = N)] attribute on oneof variant")
    })?;
    validate_tag(tag, variant.span())?;

    Ok(OneofVariantInfo {
        name: &variant.ident,
        ty,
        tag,
        is_message: raw.message,
    })
}

/// For a message-typed variant, the inner `#[derive(ProtoMessage)]` type and
/// whether the variant payload is `Box`-wrapped.
fn message_variant_shape(v: &OneofVariantInfo<'_>) -> (&Type, bool) {
    match extract_box_inner_type(v.ty) {
        Some(inner) => (inner, true),
        None => (v.ty, false),
    }
}

fn generate_oneof_decode(enum_name: &Ident, variants: &[OneofVariantInfo]) -> TokenStream2 {
    let decode_arms = variants.iter().map(|v| {
        let vname = v.name;
        let tag = v.tag;

        if v.is_message {
            let (inner, boxed) = message_variant_shape(v);
            let wrap = if boxed {
                quote! { Box::new(value) }
            } else {
                quote! { value }
            };
            quote! {
                #tag => {
                    if wire_type != protodsl::wire::WireType::Len {
                        return Err(protodsl::error::DecodeError::InvalidWireType(wire_type.into_val()));
                    }
                    let value: #inner = protodsl::codec::decode_message_field(buf)?;
                    Ok(Some(#enum_name::#vname(#wrap)))
                }
            }
        } else {
            let vty = v.ty;
            quote! {
                #tag => {
                    if wire_type != <#vty as protodsl::codec::ProtoType>::WIRE_TYPE {
                        return Err(protodsl::error::DecodeError::InvalidWireType(wire_type.into_val()));
                    }
                    let mut value = <#vty as ::core::default::Default>::default();
                    <#vty as protodsl::codec::ProtoDecode>::decode_into(buf, &mut value, offset)?;
                    Ok(Some(#enum_name::#vname(value)))
                }
            }
        }
    });

    quote! {
        fn decode_variant<B: bytes::Buf>(
            tag: u32,
            wire_type: protodsl::wire::WireType,
            buf: &mut B,
            offset: usize,
        ) -> Result<Option<Self>, protodsl::error::DecodeError> {
            match tag {
                #(#decode_arms)*
                _ => Ok(None),
            }
        }
    }
}

fn generate_oneof_encode(enum_name: &Ident, variants: &[OneofVariantInfo]) -> TokenStream2 {
    let encode_arms = variants.iter().map(|v| {
        let vname = v.name;
        let tag = v.tag;

        if v.is_message {
            let (_, boxed) = message_variant_shape(v);
            let deref = if boxed { quote! { value.as_ref() } } else { quote! { value } };
            quote! {
                #enum_name::#vname(ref value) => {
                    protodsl::wire::encode_key(protodsl::wire::WireType::Len, #tag, buf);
                    protodsl::codec::encode_message_field(#deref, buf, cache);
                }
            }
        } else {
            let vty = v.ty;
            quote! {
                #enum_name::#vname(ref value) => {
                    protodsl::wire::encode_key(<#vty as protodsl::codec::ProtoType>::WIRE_TYPE, #tag, buf);
                    <#vty as protodsl::codec::ProtoEncode>::encode(value, buf);
                }
            }
        }
    });

    quote! {
        fn encode_variant<B: bytes::BufMut>(&self, buf: &mut B, cache: &mut protodsl::codec::LenCacheReader<'_>) {
            match self {
                #(#encode_arms)*
            }
        }
    }
}

fn generate_oneof_len(enum_name: &Ident, variants: &[OneofVariantInfo]) -> TokenStream2 {
    let len_arms = variants.iter().map(|v| {
        let vname = v.name;
        let tag = v.tag;

        if v.is_message {
            let (_, boxed) = message_variant_shape(v);
            let deref = if boxed { quote! { value.as_ref() } } else { quote! { value } };
            quote! {
                #enum_name::#vname(ref value) => {
                    protodsl::wire::encoded_key_len(#tag) + protodsl::codec::encoded_message_field_len(#deref, cache)
                }
            }
        } else {
            let vty = v.ty;
            quote! {
                #enum_name::#vname(ref value) => {
                    protodsl::wire::encoded_key_len(#tag) + <#vty as protodsl::codec::ProtoEncode>::encoded_len(value)
                }
            }
        }
    });

    quote! {
        fn encoded_variant_len(&self, cache: &mut protodsl::codec::LenCache) -> usize {
            match self {
                #(#len_arms)*
            }
        }
    }
}

fn generate_oneof_tag(enum_name: &Ident, variants: &[OneofVariantInfo]) -> TokenStream2 {
    let tag_arms = variants.iter().map(|v| {
        let vname = v.name;
        let tag = v.tag;
        quote! { #enum_name::#vname(_) => #tag }
    });

    quote! {
        fn variant_tag(&self) -> u32 {
            match self {
                #(#tag_arms),*
            }
        }
    }
}

fn generate_oneof_wire_type(enum_name: &Ident, variants: &[OneofVariantInfo]) -> TokenStream2 {
    let wire_type_arms = variants.iter().map(|v| {
        let vname = v.name;
        if v.is_message {
            quote! { #enum_name::#vname(_) => protodsl::wire::WireType::Len }
        } else {
            let vty = v.ty;
            quote! { #enum_name::#vname(_) => <#vty as protodsl::codec::ProtoType>::WIRE_TYPE }
        }
    });

    quote! {
        fn variant_wire_type(&self) -> protodsl::wire::WireType {
            match self {
                #(#wire_type_arms),*
            }
        }
    }
}

fn generate_oneof_schema(variants: &[OneofVariantInfo]) -> TokenStream2 {
    let entries = variants.iter().map(|v| {
        let tag = v.tag;
        let vname_str = v.name.to_string().to_lowercase();
        let ty_name = if v.is_message {
            let (inner, _) = message_variant_shape(v);
            schema_type_name(inner).unwrap_or_else(|| "UNKNOWN".to_string())
        } else {
            schema_type_name(v.ty).unwrap_or_else(|| "UNKNOWN".to_string())
        };
        quote! { (#ty_name, #vname_str, #tag) }
    });

    quote! {
        #[cfg(feature = "alloc")]
        fn oneof_schema() -> protodsl::alloc::vec::Vec<(&'static str, &'static str, u32)> {
            protodsl::alloc::vec![#(#entries),*]
        }
    }
}
