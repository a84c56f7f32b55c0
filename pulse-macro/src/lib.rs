use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod to_record;
mod parser;

#[proc_macro_derive(ToRecord, attributes(pulse))]
pub fn derive_to_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    to_record::derive_to_record_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
