use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn};

/// Automatically profile a function when the `perf_stats` feature is enabled.
///
/// This macro wraps the function body with a drop guard that logs the
/// execution time on function exit. Compiles to nothing when the
/// `perf_stats` feature of the calling crate is disabled.
///
/// # Features
/// - Logs through `tracing::info!`, so the calling crate must depend on `tracing`
/// - Logs when the body runs longer than the threshold (default 1ms)
/// - With the `tick` flag on a method, also logs every 100 ticks,
///   reading `self.tick` on entry
///
/// # Example
/// ```ignore
/// impl World {
///     #[profile(16, tick)]  // Warn if a whole tick takes > 16ms
///     pub fn observe(&mut self, delta_time: FixedNum) { ... }
/// }
/// ```
///
/// # Optional Parameters
/// ```ignore
/// #[profile(2)]  // Custom threshold in milliseconds
/// fn expensive_function() { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    // Parse "threshold" and/or "tick" from the attribute, in any order
    let attr_str = attr.to_string();
    let mut threshold_ms: u128 = 1;
    let mut wants_tick = false;
    for part in attr_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if part == "tick" {
            wants_tick = true;
        } else if let Ok(value) = part.parse() {
            threshold_ms = value;
        }
    }

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    // Tick-based logging only makes sense on methods of a type with a `tick` field
    let has_receiver = sig
        .inputs
        .iter()
        .any(|arg| matches!(arg, FnArg::Receiver(_)));

    let profile_guard_def = if wants_tick && has_receiver {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
                tick_value: u64,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms || (self.tick_value % 100 == 0) {
                        ::tracing::info!("[PERF] {}: {:?}", self.name, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
                tick_value: self.tick,
            }
        }
    } else {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms {
                        ::tracing::info!("[PERF] {}: {:?}", self.name, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
            }
        }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                #profile_guard_def
            };

            #block
        }
    };

    output.into()
}
