mod decode_column;
mod table_name;

use decode_column::{ColumnMetadata, Semantic, decode_column};
use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemStruct, parse_macro_input};
use table_name::table_name;

/// Derive `silo::Entity` for a plain struct with named fields.
///
/// The struct must carry `Default` and declare an integer field literally
/// named `id`: that column is the auto-generated primary key and is excluded
/// from insert/update value lists. Columns are registered in field
/// declaration order.
///
/// Attributes: `#[silo(table = "...")]` on the struct,
/// `#[silo(name = "...")]` and `#[silo(ignore)]` on fields.
#[proc_macro_derive(Entity, attributes(silo))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let ident = &item.ident;
    let entity_name = ident.to_string();
    let table = table_name(&item);
    let Fields::Named(fields) = &item.fields else {
        panic!("Entity can only be derived for a struct with named fields");
    };
    let columns: Vec<ColumnMetadata> = fields.named.iter().filter_map(decode_column).collect();
    let Some(key) = columns.iter().find(|c| c.name == "id") else {
        panic!("Entity `{}` must declare an `id` field", entity_name);
    };
    if key.semantic != Semantic::Integer {
        panic!(
            "The `id` field of entity `{}` must be an integer, it is the auto-generated primary key",
            entity_name
        );
    }
    let key_ident = &key.ident;
    let column_defs = columns.iter().map(|c| {
        let name = &c.name;
        let ty = c.semantic.tokens();
        let primary_key = c.name == "id";
        quote! {
            ::silo::ColumnDef {
                name: #name,
                ty: #ty,
                primary_key: #primary_key,
            }
        }
    });
    let values = columns.iter().filter(|c| c.name != "id").map(|c| {
        let name = &c.name;
        let field = &c.ident;
        quote!((#name, ::silo::AsValue::as_value(&self.#field)))
    });
    let set_field_arms = columns.iter().map(|c| {
        let name = &c.name;
        let field = &c.ident;
        quote! {
            #name => self.#field = ::silo::AsValue::try_from_value(value)?,
        }
    });
    quote! {
        impl ::silo::Entity for #ident {
            fn table() -> ::silo::TableRef {
                ::silo::TableRef {
                    qualified: ::std::borrow::Cow::Borrowed(::std::any::type_name::<Self>()),
                    entity: ::std::borrow::Cow::Borrowed(#entity_name),
                    name: ::std::borrow::Cow::Borrowed(#table),
                }
            }
            fn columns() -> &'static [::silo::ColumnDef] {
                static COLUMNS: &[::silo::ColumnDef] = &[#(#column_defs),*];
                COLUMNS
            }
            fn values(&self) -> ::std::vec::Vec<(&'static str, ::silo::Value)> {
                ::std::vec![#(#values),*]
            }
            fn set_field(
                &mut self,
                column: &str,
                value: &::silo::Value,
            ) -> ::silo::Result<bool> {
                match column {
                    #(#set_field_arms)*
                    _ => return Ok(false),
                }
                Ok(true)
            }
            fn id(&self) -> i64 {
                self.#key_ident as i64
            }
            fn set_id(&mut self, id: i64) {
                self.#key_ident = id as _;
            }
        }
    }
    .into()
}
