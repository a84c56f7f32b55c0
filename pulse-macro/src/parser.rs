use syn::{Data, DeriveInput, Error, Fields, LitStr, spanned::Spanned as _};

#[derive(Debug)]
pub(crate) enum FieldType {
    Time,
    Tag,
    Field,
}

#[derive(Debug)]
pub(crate) struct FieldInfo {
    pub field_name: syn::Ident,
    pub field_type: FieldType,
    pub rename: Option<String>,
    pub ignore: bool,
}

#[derive(Debug)]
pub(crate) struct StructInfo<'a> {
    pub struct_name: &'a syn::Ident,
    pub record_name: String,
    pub fields: Vec<FieldInfo>,
}

pub(crate) fn parse_struct(input: &'_ DeriveInput) -> Result<StructInfo<'_>, Error> {
    let struct_name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return Err(Error::new(input.span(), "ToRecord can only be derived for structs"));
    };

    let mut record_name = None;

    for attr in &input.attrs {
        if attr.path().is_ident("pulse") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    record_name = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("Unknown pulse attribute, expected `name`"))
                }
            })?;
        }
    }

    let fields = parse_fields(&data_struct.fields)?;
    let record_name = record_name.unwrap_or_else(|| to_snake_case(&struct_name.to_string()));

    Ok(StructInfo {
        struct_name,
        record_name,
        fields,
    })
}

fn parse_fields(fields: &Fields) -> Result<Vec<FieldInfo>, Error> {
    let Fields::Named(fields) = fields else {
        return Err(Error::new(
            fields.span(),
            "ToRecord can only be derived for structs with named fields"
        ));
    };

    let mut field_infos = Vec::new();
    let mut time_field_count = 0;

    for field in &fields.named {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(Error::new(field.span(), "expected a named field"));
        };

        let mut is_time = field_name == "time";
        let mut is_tag = false;
        let mut rename = None;
        let mut ignore = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("pulse") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("time") {
                    is_time = true;
                } else if meta.path.is_ident("tag") {
                    is_tag = true;
                } else if meta.path.is_ident("rename") {
                    rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("ignore") {
                    ignore = true;
                } else {
                    return Err(meta.error("Unknown pulse attribute"));
                }
                Ok(())
            })?;
        }

        if ignore && (is_tag || (is_time && field_name != "time")) {
            return Err(Error::new(field.span(), "Ignored fields cannot be marked as tag or time"));
        }
        if is_time && is_tag {
            return Err(Error::new(field.span(), "A field cannot be both tag and time"));
        }

        let field_type = if is_time && !ignore {
            time_field_count += 1;
            FieldType::Time
        } else if is_tag {
            FieldType::Tag
        } else {
            FieldType::Field
        };

        if time_field_count > 1 && matches!(field_type, FieldType::Time) {
            return Err(Error::new(
                field.span(),
                "Only one field can be the record time (a field named `time` or marked #[pulse(time)])"
            ));
        }

        field_infos.push(FieldInfo {
            field_name: field_name.clone(),
            field_type,
            rename,
            ignore,
        });
    }

    Ok(field_infos)
}

fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_cases_struct_names() {
        assert_eq!(to_snake_case("CpuUsage"), "cpu_usage");
        assert_eq!(to_snake_case("Disk2Io"), "disk2_io");
        assert_eq!(to_snake_case("HTTP"), "http");
    }

    #[test]
    fn parses_field_roles() {
        let input: DeriveInput = syn::parse_quote! {
            #[pulse(name = "cpu_usage")]
            struct Cpu {
                #[pulse(tag)]
                host: String,
                #[pulse(rename = "idle_pct")]
                idle: f64,
                #[pulse(ignore)]
                scratch: Vec<u8>,
                time: chrono::DateTime<chrono::Utc>,
            }
        };
        let info = parse_struct(&input).unwrap();
        assert_eq!(info.record_name, "cpu_usage");
        assert!(matches!(info.fields[0].field_type, FieldType::Tag));
        assert_eq!(info.fields[1].rename.as_deref(), Some("idle_pct"));
        assert!(info.fields[2].ignore);
        assert!(matches!(info.fields[3].field_type, FieldType::Time));
    }

    #[test]
    fn rejects_two_time_fields() {
        let input: DeriveInput = syn::parse_quote! {
            struct Bad {
                time: i64,
                #[pulse(time)]
                at: i64,
            }
        };
        assert!(parse_struct(&input).is_err());
    }

    #[test]
    fn rejects_enums() {
        let input: DeriveInput = syn::parse_quote! {
            enum Nope { A }
        };
        assert!(parse_struct(&input).is_err());
    }
}
