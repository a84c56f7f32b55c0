use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Error};

use crate::parser::{FieldType, parse_struct};

pub fn derive_to_record_impl(input: DeriveInput) -> Result<TokenStream, Error> {
    let info = parse_struct(&input)?;
    let ident = info.struct_name;
    let name = &info.record_name;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut setters = Vec::new();
    let mut timestamp = quote! { chrono::Utc::now() };

    for field in info.fields.into_iter().filter(|f| !f.ignore) {
        let member = field.field_name;
        let key = field.rename.unwrap_or_else(|| member.to_string());

        match field.field_type {
            FieldType::Time => timestamp = quote! { self.#member },
            FieldType::Tag => setters.push(quote! {
                record.set_tag(#key, &::std::string::ToString::to_string(&self.#member));
            }),
            FieldType::Field => setters.push(quote! {
                record.set_field(#key, self.#member);
            }),
        }
    }

    Ok(quote! {
        impl #impl_generics pulse_core::ToRecord for #ident #ty_generics #where_clause {
            fn to_record(self) -> pulse_core::Record {
                let mut record = pulse_core::Record::new_with_name(#name);
                record.set_timestamp(#timestamp);
                #(#setters)*
                record
            }
        }
    })
}
