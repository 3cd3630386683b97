/// Run `f`, adding its wall time in milliseconds to `acc` only when timing is on.
#[inline]
pub(crate) fn timed<R>(enabled: bool, acc: &mut f64, f: impl FnOnce() -> R) -> R {
    if !enabled {
        return f();
    }

    #[cfg(target_arch = "wasm32")]
    {
        let t0 = js_sys::Date::now();
        let out = f();
        *acc += js_sys::Date::now() - t0;
        out
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let t0 = std::time::Instant::now();
        let out = f();
        *acc += t0.elapsed().as_secs_f64() * 1000.0;
        out
    }
}
