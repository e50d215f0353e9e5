use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Field, GenericArgument, Ident, LitStr, PathArguments, Type, parse::ParseBuffer};

/// Mirror of `silo_core::SemanticType` usable during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Semantic {
    Integer,
    Float32,
    Float64,
    Boolean,
    Text,
}

impl Semantic {
    pub(crate) fn tokens(&self) -> TokenStream {
        match self {
            Semantic::Integer => quote!(::silo::SemanticType::Integer),
            Semantic::Float32 => quote!(::silo::SemanticType::Float32),
            Semantic::Float64 => quote!(::silo::SemanticType::Float64),
            Semantic::Boolean => quote!(::silo::SemanticType::Boolean),
            Semantic::Text => quote!(::silo::SemanticType::Text),
        }
    }
}

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    pub(crate) semantic: Semantic,
}

fn semantic_of(ty: &Type) -> Option<Semantic> {
    let Type::Path(path) = ty else {
        return None;
    };
    if let Some(ident) = path.path.get_ident() {
        return match ident.to_string().as_str() {
            "bool" => Some(Semantic::Boolean),
            "i32" | "i64" => Some(Semantic::Integer),
            "f32" => Some(Semantic::Float32),
            "f64" => Some(Semantic::Float64),
            "String" => Some(Semantic::Text),
            _ => None,
        };
    }
    let last = path.path.segments.last()?;
    match last.ident.to_string().as_str() {
        "String" => Some(Semantic::Text),
        "Option" => {
            let PathArguments::AngleBracketed(bracketed) = &last.arguments else {
                return None;
            };
            let GenericArgument::Type(inner) = bracketed.args.first()? else {
                return None;
            };
            semantic_of(inner)
        }
        _ => None,
    }
}

/// Decode one struct field into column metadata.
///
/// Returns `None` for `#[silo(ignore)]` fields. A field of a type outside
/// the supported catalog is rejected here rather than silently skipped at
/// materialization time.
pub(crate) fn decode_column(field: &Field) -> Option<ColumnMetadata> {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut ignore = false;
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("silo") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `silo`, use it like: `#[silo(attribute = value, ...)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("ignore") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!("Error while parsing `ignore`, use it like: `#[silo(ignore)]`");
                    };
                    ignore = true;
                } else if arg.path.is_ident("name") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `name`, use it like: `#[silo(name = \"my_column\")]`"
                        );
                    };
                    name = v.value();
                } else {
                    panic!(
                        "Unknown attribute `{}` inside silo macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    if ignore {
        return None;
    }
    let Some(semantic) = semantic_of(&field.ty) else {
        panic!(
            "Field `{}` has unsupported type `{}`, use bool, i32, i64, f32, f64 or String, or mark it `#[silo(ignore)]`",
            name,
            field.ty.to_token_stream()
        );
    };
    Some(ColumnMetadata {
        ident,
        name,
        semantic,
    })
}
