use syn::{ItemStruct, LitStr, parse::ParseBuffer};

/// Table name for the entity: `#[silo(table = "...")]` when present,
/// otherwise the lowercased struct name.
pub(crate) fn table_name(item: &ItemStruct) -> String {
    let mut name = item.ident.to_string().to_lowercase();
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("silo") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `silo`, use it like: `#[silo(table = \"my_table\")]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("table") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `table`, use it like: `#[silo(table = \"my_table\")]`"
                        );
                    };
                    name = v.value();
                }
                Ok(())
            });
        }
    }
    name
}
