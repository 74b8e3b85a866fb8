//! ToRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs::field_attr;

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "ToRow can only be derived for structs with named fields; use a tuple for positional rows",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "ToRow can only be derived for structs",
            ));
        }
    };

    let mut specs = Vec::new();
    let mut arms = Vec::new();
    // Only bound fields need a conversion; skipped fields may hold anything.
    let mut bounds: Vec<syn::WherePredicate> = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let attr = field_attr(field)?;
        // `r#type` binds as `type`
        let field_name = field_ident.unraw().to_string();

        let mut spec = quote! { ::spanqb::row::FieldSpec::new(#field_name) };
        if let Some(column) = &attr.column {
            spec = quote! { #spec.column(#column) };
        }
        if attr.skip {
            spec = quote! { #spec.skip() };
        } else {
            let ty = &field.ty;
            bounds.push(syn::parse_quote!(#ty: ::spanqb::value::ToExpr));
            arms.push(quote! {
                #index => ::spanqb::value::ToExpr::to_expr(&self.#field_ident),
            });
        }
        specs.push(spec);
    }

    let mut generics = input.generics.clone();
    generics.make_where_clause().predicates.extend(bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::spanqb::row::Record for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn fields() -> &'static [::spanqb::row::FieldSpec] {
                const FIELDS: &[::spanqb::row::FieldSpec] = &[#(#specs),*];
                FIELDS
            }

            fn field_expr(&self, index: usize) -> ::spanqb::error::QbResult<::spanqb::ast::Expr> {
                match index {
                    #(#arms)*
                    _ => ::core::result::Result::Err(::spanqb::error::Error::column_not_found(
                        #type_name,
                        ::std::format!("#{}", index),
                    )),
                }
            }
        }

        impl #impl_generics ::spanqb::row::ToRow for #name #ty_generics #where_clause {
            fn to_row(
                &self,
                columns: &[::std::string::String],
            ) -> ::spanqb::error::QbResult<::spanqb::row::Row> {
                ::spanqb::row::bind_record(self, columns)
            }
        }
    })
}
