//! Request middleware shim
//!
//! Wraps a request handler around a unit of work's accumulator. The
//! handler sees the accumulator so it can add entries; `terminate`
//! reports and flushes once the response has been sent.

use crate::wide_load::WideLoad;

/// Binds one request to its accumulator
#[derive(Debug)]
pub struct WideLoadMiddleware<'a> {
    wide_load: &'a mut WideLoad,
}

impl<'a> WideLoadMiddleware<'a> {
    pub fn new(wide_load: &'a mut WideLoad) -> Self {
        Self { wide_load }
    }

    /// Pass the request through to `next` unchanged.
    pub fn handle<Req, Res, F>(&mut self, request: Req, next: F) -> Res
    where
        F: FnOnce(Req, &mut WideLoad) -> Res,
    {
        next(request, &mut *self.wide_load)
    }

    /// Report and flush unconditionally.
    ///
    /// Unlike the lifecycle hooks this does not consult the
    /// auto-reporting flag: terminating the middleware is itself the
    /// explicit end of the request. A later `Terminating` signal then
    /// finds the accumulator empty.
    pub fn terminate(self) {
        self.wide_load.report();
        self.wide_load.flush();
    }
}
