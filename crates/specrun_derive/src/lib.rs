//! The `#[spec]` attribute macro.
//!
//! Applied to an inherent `impl` block, it keeps the block unchanged and implements `specrun::Spec` for the type:
//! every method whose name carries a role keyword is registered, in declaration order, with a callable body. This
//! is how a spec describes its own methods without runtime reflection.
//!
//! Method shapes:
//! - `fn name(&self)` / `fn name(&mut self)`: a step.
//! - `fn name(&mut self, example: &E)` (or `example: E`, cloned): a step that receives the current example.
//! - `fn examples() -> impl IntoIterator<Item = E>`: the example provider.
//!
//! Steps return `()` or `Result<(), E>` for any `E` convertible into `specrun::SpecError`.
//!
//! Attribute options:
//! - `name = "..."`: display name (defaults to the type name).
//! - `example = Type`: example type (defaults to the base's, or `()`).
//! - `extends = Base, via = field`: `Base` is itself a `#[spec]` type embedded in `field`; its levels run as
//!   ancestors of this one.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Type, parse_macro_input};

#[derive(Default)]
struct SpecArgs {
    name: Option<LitStr>,
    example: Option<Type>,
    extends: Option<Type>,
    via: Option<Ident>,
}

/// Turn an inherent `impl` block into a spec.
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct WhenParsing { input: String, result: Option<i32> }
///
/// #[spec(example = &'static str)]
/// impl WhenParsing {
///     fn examples() -> Vec<&'static str> { vec!["1", "22"] }
///     fn because_we_parse(&mut self, input: &&'static str) { self.result = input.parse().ok(); }
///     fn it_should_succeed(&self) { assert!(self.result.is_some()); }
/// }
/// ```
#[proc_macro_attribute]
pub fn spec(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut spec_args = SpecArgs::default();
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            spec_args.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("example") {
            spec_args.example = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("extends") {
            spec_args.extends = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("via") {
            spec_args.via = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unsupported spec option; expected `name`, `example`, `extends` or `via`"));
        }
        Ok(())
    });
    parse_macro_input!(args with parser);
    let item = parse_macro_input!(input as ItemImpl);

    match expand(spec_args, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn type_label(ty: &Type) -> String {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        other => quote!(#other).to_string(),
    }
}

fn expand(args: SpecArgs, item: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(path.span(), "#[spec] goes on an inherent impl block"));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(item.generics.span(), "#[spec] types cannot be generic"));
    }

    let self_ty = &item.self_ty;
    let display = match &args.name {
        Some(name) => name.value(),
        None => type_label(self_ty),
    };

    let mut registrations = Vec::new();
    for impl_item in &item.items {
        if let ImplItem::Fn(method) = impl_item {
            if !specrun_core::role_matches(&method.sig.ident.to_string()).is_empty() {
                registrations.push(register(method)?);
            }
        }
    }

    let example = match (&args.example, &args.extends) {
        (Some(example), _) => quote!(#example),
        (None, Some(base)) => quote!(<#base as ::specrun::Spec>::Example),
        (None, None) => quote!(()),
    };

    let inherit = match (&args.extends, &args.via) {
        (Some(base), Some(field)) => quote! {
            ancestry.extend(
                <#base as ::specrun::Spec>::ancestry()
                    .into_iter()
                    .map(|level| level.project::<Self>(|s: &mut Self| &mut s.#field)),
            );
        },
        (Some(base), None) => {
            return Err(syn::Error::new(
                base.span(),
                "`extends` needs `via = field`, the field that embeds the base spec",
            ));
        }
        (None, Some(field)) => return Err(syn::Error::new(field.span(), "`via` is only used with `extends`")),
        (None, None) => quote!(),
    };

    Ok(quote! {
        #item

        impl ::specrun::Spec for #self_ty {
            type Example = #example;

            fn ancestry() -> ::std::vec::Vec<::specrun::TypeDescriptor<Self, Self::Example>> {
                let level = ::specrun::TypeDescriptor::<Self, Self::Example>::new(#display)
                    #(#registrations)*;
                #[allow(unused_mut)]
                let mut ancestry = ::std::vec![level];
                #inherit
                ancestry
            }

            fn create() -> Self {
                <Self as ::core::default::Default>::default()
            }
        }
    })
}

/// The builder call that registers one role method.
fn register(method: &ImplItemFn) -> syn::Result<TokenStream2> {
    let sig = &method.sig;
    let ident = &sig.ident;
    let name = ident.to_string();

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(asyncness.span(), "spec methods cannot be async"));
    }

    let params: Vec<&Type> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(&*pat.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let Some(receiver) = sig.receiver() else {
        if name == specrun_core::roles::EXAMPLES_METHOD && params.is_empty() {
            return Ok(quote!(.examples(Self::#ident)));
        }
        return Err(syn::Error::new(
            sig.span(),
            format!("`{name}` matches a spec role, so it must take `&self` or `&mut self`"),
        ));
    };
    if !matches!(&*receiver.ty, Type::Reference(_)) {
        return Err(syn::Error::new(
            receiver.span(),
            "spec methods take `&self` or `&mut self`, not `self`",
        ));
    }

    match params.as_slice() {
        [] => Ok(quote!(.method(#name, |s: &mut Self| Self::#ident(s)))),
        [Type::Reference(_)] => Ok(quote! {
            .method_with_example(#name, |s: &mut Self, example: &Self::Example| Self::#ident(s, example))
        }),
        [_] => Ok(quote! {
            .method_with_example(#name, |s: &mut Self, example: &Self::Example| {
                Self::#ident(s, ::core::clone::Clone::clone(example))
            })
        }),
        _ => Err(syn::Error::new(
            sig.inputs.span(),
            format!("`{name}` takes at most one parameter besides the receiver: the current example"),
        )),
    }
}
