use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one, enable logging, and
/// inject dependencies backed by a fresh in-memory store.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`],
/// [`crate::store::MemoryStore`] (the store behind the client), and
/// [`crate::engine::Engine`] (the engine the client's routes use).
///
/// `#[backend_test(voters)]` also registers the example voters "alice" (30),
/// "bob" (25) and "carol" (15) before the test starts.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Register voters if needed.
    let maybe_voters = match parse_macro_input!(args as Option<Ident>) {
        Some(arg) if arg == "voters" => quote! {
            for (id, age) in [("alice", 30), ("bob", 25), ("carol", 15)] {
                crate::store::Store::upsert_voter(
                    &store,
                    &crate::model::db::voter::Voter::example(id, age),
                )
                .await
                .unwrap();
            }
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected no argument or `voters`")
                .into_compile_error()
                .into();
        }
        None => quote! {},
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (
                rocket::local::asynchronous::Client,
                crate::store::MemoryStore,
                crate::engine::Engine,
            ) {
                log4rs_test_utils::test_logging::init_logging_once_for(
                    ["ballotbox_backend"],
                    None,
                    None,
                );

                let store = crate::store::MemoryStore::new();
                let rocket = crate::rocket_for_store(std::sync::Arc::new(store.clone()));
                let rocket_client = rocket::local::asynchronous::Client::tracked(rocket)
                    .await
                    .unwrap();
                let engine = rocket_client
                    .rocket()
                    .state::<crate::engine::Engine>()
                    .unwrap()
                    .clone();

                #maybe_voters

                (rocket_client, store, engine)
            }

            /// The test itself.
            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                #[allow(unused_variables)]
                let (rocket_client, store, engine) = setup().await;
                #new_name(#(#test_args),*).await
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut seen = vec![];
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                if let Some(type_ident) = type_path.path.segments.last().map(|s| &s.ident) {
                    let arg = if type_ident == "Client" {
                        Some(quote! { rocket_client })
                    } else if type_ident == "MemoryStore" {
                        Some(quote! { store.clone() })
                    } else if type_ident == "Engine" {
                        Some(quote! { engine.clone() })
                    } else {
                        None
                    };
                    if let Some(arg) = arg {
                        if seen.contains(type_ident) {
                            return Err(syn::Error::new(
                                input.span(),
                                format!("Test cannot accept more than one `{type_ident}`"),
                            ));
                        }
                        seen.push(type_ident.clone());
                        args.push(arg);
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `store_ident: MemoryStore` or `engine_ident: Engine`",
        ));
    }

    Ok(args)
}
