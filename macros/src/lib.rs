use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Implements `outcomes::Outcomes` for a fieldless enum, declaring every
/// variant in the order they are written.
#[proc_macro_derive(Outcomes)]
pub fn derive_outcomes(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Used in the quasi-quotation below as `#name`.
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let variants = match declared_variants(&input) {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics ::outcomes::Outcomes for #name #ty_generics #where_clause {
            fn declared() -> ::std::vec::Vec<Self> {
                ::std::vec![#(#variants),*]
            }
        }
    };

    proc_macro::TokenStream::from(expanded)
}

/// Builds `Self::Variant` expression for every unit variant, rejects
/// everything that is not an enum made only of those.
fn declared_variants(input: &DeriveInput) -> syn::Result<Vec<TokenStream>> {
    let data = match input.data {
        Data::Enum(ref data) => data,
        Data::Struct(_) | Data::Union(_) => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Outcomes can only be derived for enums",
            ))
        }
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new(
            input.ident.span(),
            "Outcomes requires at least one variant",
        ));
    }

    data.variants
        .iter()
        .map(|variant| match variant.fields {
            Fields::Unit => {
                let ident = &variant.ident;
                Ok(quote_spanned!(variant.span() => Self::#ident))
            }
            Fields::Named(_) | Fields::Unnamed(_) => Err(syn::Error::new(
                variant.span(),
                "Outcomes variants can not carry fields",
            )),
        })
        .collect()
}
