//! An Xlib backed implementation of [`XConn`].
//!
//! This is the only place in the crate that talks to the C X11 libraries:
//! everything is funnelled through narrow unsafe helpers and surfaced to the
//! rest of the crate as safe [`XConn`] methods. Bar text is rendered with
//! Xft, monitors are discovered through XRandR.
use crate::{
    bindings::KeyPress,
    pure::geometry::Rect,
    x::{
        event::{ConfigureRequest, ExposeEvent, XEvent},
        XConn,
    },
    Color, Error, Result, Xid,
};
use std::{
    cell::RefCell,
    collections::HashMap,
    ffi::CString,
    mem,
    os::raw::{c_int, c_long, c_uchar, c_ulong},
    os::unix::io::RawFd,
    ptr, slice,
};
use tracing::{error, info, warn};
use x11::{
    xft::{
        XftColor, XftColorAllocName, XftDraw, XftDrawCreate, XftDrawDestroy, XftDrawStringUtf8,
        XftFont, XftFontClose, XftFontOpenName, XftTextExtentsUtf8,
    },
    xlib,
    xrandr::{
        RR_Connected, XRRFreeCrtcInfo, XRRFreeOutputInfo, XRRFreeScreenResources, XRRGetCrtcInfo,
        XRRGetOutputInfo, XRRGetScreenResources,
    },
    xrender::XGlyphInfo,
};

const XC_LEFT_PTR: u32 = 68;

// Never let Xlib kill us: a BadWindow from a client that died mid-request is
// routine for a window manager.
unsafe extern "C" fn on_x_error(_: *mut xlib::Display, e: *mut xlib::XErrorEvent) -> c_int {
    let e = *e;
    error!(kind = e.type_, code = e.error_code, "X error");
    0
}

struct BarSurface {
    gc: xlib::GC,
    draw: *mut XftDraw,
}

/// A live Xlib connection to the X server.
///
/// Holds the display pointer, the bar font and per-bar drawing surfaces.
/// Interior mutability covers the color and surface caches so that all of
/// the [`XConn`] methods can take `&self`.
pub struct XlibConn {
    dpy: *mut xlib::Display,
    screen: c_int,
    root: xlib::Window,
    font: *mut XftFont,
    wm_protocols: xlib::Atom,
    wm_delete: xlib::Atom,
    bars: RefCell<HashMap<Xid, BarSurface>>,
    pixels: RefCell<HashMap<Color, c_ulong>>,
    xft_colors: RefCell<HashMap<Color, XftColor>>,
}

impl XlibConn {
    /// Open the display named by `DISPLAY` and perform the startup wiring:
    /// error handler, root cursor, root event mask selection, atom interning
    /// and loading the bar font.
    ///
    /// Errors if the display cannot be opened or the font cannot be loaded;
    /// both are fatal at startup.
    pub fn connect(font: &str) -> Result<Self> {
        let dpy = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if dpy.is_null() {
            return Err(Error::CannotOpenDisplay);
        }

        let (screen, root, wm_protocols, wm_delete, xfont) = unsafe {
            xlib::XSetErrorHandler(Some(on_x_error));

            let screen = xlib::XDefaultScreen(dpy);
            let root = xlib::XRootWindow(dpy, screen);

            let cursor = xlib::XCreateFontCursor(dpy, XC_LEFT_PTR);
            xlib::XDefineCursor(dpy, root, cursor);

            // substructure redirection is what makes us the window manager
            xlib::XSelectInput(
                dpy,
                root,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask,
            );

            let protocols = CString::new("WM_PROTOCOLS").expect("valid atom name");
            let delete = CString::new("WM_DELETE_WINDOW").expect("valid atom name");
            let wm_protocols = xlib::XInternAtom(dpy, protocols.as_ptr(), xlib::False);
            let wm_delete = xlib::XInternAtom(dpy, delete.as_ptr(), xlib::False);

            let c_font = CString::new(font).map_err(|_| Error::FontLoad(font.to_owned()))?;
            let xfont = XftFontOpenName(dpy, screen, c_font.as_ptr());
            if xfont.is_null() {
                xlib::XCloseDisplay(dpy);
                return Err(Error::FontLoad(font.to_owned()));
            }

            (screen, root, wm_protocols, wm_delete, xfont)
        };

        info!(%font, "connected to the X server");

        Ok(Self {
            dpy,
            screen,
            root,
            font: xfont,
            wm_protocols,
            wm_delete,
            bars: RefCell::new(HashMap::new()),
            pixels: RefCell::new(HashMap::new()),
            xft_colors: RefCell::new(HashMap::new()),
        })
    }

    /// The file descriptor of the X connection, for closing in spawned
    /// children.
    pub fn connection_fd(&self) -> RawFd {
        unsafe { xlib::XConnectionNumber(self.dpy) }
    }

    fn pixel_for(&self, color: Color) -> Result<c_ulong> {
        if let Some(&pixel) = self.pixels.borrow().get(&color) {
            return Ok(pixel);
        }

        let name = color.as_hex_string();
        let c_name = CString::new(name.clone()).map_err(|_| Error::ColorAlloc(name.clone()))?;
        let mut screen_def: xlib::XColor = unsafe { mem::zeroed() };
        let mut exact_def: xlib::XColor = unsafe { mem::zeroed() };

        let res = unsafe {
            xlib::XAllocNamedColor(
                self.dpy,
                xlib::XDefaultColormap(self.dpy, self.screen),
                c_name.as_ptr(),
                &mut screen_def,
                &mut exact_def,
            )
        };

        if res == 0 {
            return Err(Error::ColorAlloc(name));
        }

        self.pixels.borrow_mut().insert(color, screen_def.pixel);

        Ok(screen_def.pixel)
    }

    fn xft_color_for(&self, color: Color) -> Result<XftColor> {
        if let Some(&xc) = self.xft_colors.borrow().get(&color) {
            return Ok(xc);
        }

        let name = color.as_hex_string();
        let c_name = CString::new(name.clone()).map_err(|_| Error::ColorAlloc(name.clone()))?;
        let mut xc: XftColor = unsafe { mem::zeroed() };

        let res = unsafe {
            XftColorAllocName(
                self.dpy,
                xlib::XDefaultVisual(self.dpy, self.screen),
                xlib::XDefaultColormap(self.dpy, self.screen),
                c_name.as_ptr(),
                &mut xc,
            )
        };

        if res == 0 {
            return Err(Error::ColorAlloc(name));
        }

        self.xft_colors.borrow_mut().insert(color, xc);

        Ok(xc)
    }

    fn primary_keysym(&self, keycode: u8) -> u64 {
        let mut per_code = 0;
        unsafe {
            let syms = xlib::XGetKeyboardMapping(self.dpy, keycode, 1, &mut per_code);
            if syms.is_null() || per_code == 0 {
                return 0;
            }

            let keysym = *syms;
            xlib::XFree(syms as *mut _);

            keysym
        }
    }
}

impl Drop for XlibConn {
    fn drop(&mut self) {
        unsafe {
            for (_, s) in self.bars.borrow_mut().drain() {
                XftDrawDestroy(s.draw);
                xlib::XFreeGC(self.dpy, s.gc);
            }
            XftFontClose(self.dpy, self.font);
            xlib::XCloseDisplay(self.dpy);
        }
    }
}

impl XConn for XlibConn {
    fn root(&self) -> Xid {
        Xid(self.root as u32)
    }

    fn root_geometry(&self) -> Result<Rect> {
        let (w, h) = unsafe {
            (
                xlib::XDisplayWidth(self.dpy, self.screen),
                xlib::XDisplayHeight(self.dpy, self.screen),
            )
        };

        Ok(Rect::new(0, 0, w as u32, h as u32))
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        let mut rects = vec![];

        unsafe {
            let res = XRRGetScreenResources(self.dpy, self.root);
            if res.is_null() {
                return Ok(rects);
            }

            let outputs = slice::from_raw_parts((*res).outputs, (*res).noutput as usize);
            for &output in outputs {
                let info = XRRGetOutputInfo(self.dpy, res, output);
                if info.is_null() {
                    continue;
                }

                if (*info).connection == RR_Connected && (*info).crtc != 0 {
                    let crtc = XRRGetCrtcInfo(self.dpy, res, (*info).crtc);
                    if !crtc.is_null() {
                        rects.push(Rect::new(
                            (*crtc).x as u32,
                            (*crtc).y as u32,
                            (*crtc).width,
                            (*crtc).height,
                        ));
                        XRRFreeCrtcInfo(crtc);
                    }
                }

                XRRFreeOutputInfo(info);
            }

            XRRFreeScreenResources(res);
        }

        Ok(rects)
    }

    fn create_bar(&self, r: Rect, bg: Color) -> Result<Xid> {
        let pixel = self.pixel_for(bg)?;

        let id = unsafe {
            let mut wa: xlib::XSetWindowAttributes = mem::zeroed();
            wa.override_redirect = xlib::True;
            wa.background_pixel = pixel;
            wa.event_mask = xlib::ExposureMask;

            let win = xlib::XCreateWindow(
                self.dpy,
                self.root,
                r.x as c_int,
                r.y as c_int,
                r.w,
                r.h,
                0,
                xlib::XDefaultDepth(self.dpy, self.screen),
                xlib::CopyFromParent as u32,
                xlib::XDefaultVisual(self.dpy, self.screen),
                xlib::CWOverrideRedirect | xlib::CWBackPixel | xlib::CWEventMask,
                &mut wa,
            );

            let gc = xlib::XCreateGC(self.dpy, win, 0, ptr::null_mut());
            let draw = XftDrawCreate(
                self.dpy,
                win,
                xlib::XDefaultVisual(self.dpy, self.screen),
                xlib::XDefaultColormap(self.dpy, self.screen),
            );
            xlib::XMapWindow(self.dpy, win);

            self.bars.borrow_mut().insert(Xid(win as u32), BarSurface { gc, draw });

            Xid(win as u32)
        };

        Ok(id)
    }

    fn grab_keys(&self, keys: &[KeyPress]) -> Result<()> {
        for key in keys {
            let keycode = unsafe { xlib::XKeysymToKeycode(self.dpy, key.keysym) };
            if keycode == 0 {
                warn!(keysym = key.keysym, "no keycode for keysym, skipping grab");
                continue;
            }

            unsafe {
                xlib::XGrabKey(
                    self.dpy,
                    keycode as c_int,
                    key.mask,
                    self.root,
                    xlib::True,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                );
            }
        }

        Ok(())
    }

    fn ungrab_keys(&self) -> Result<()> {
        unsafe {
            xlib::XUngrabKey(self.dpy, xlib::AnyKey, xlib::AnyModifier, self.root);
        }

        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let mut raw: xlib::XEvent = unsafe { mem::zeroed() };
            unsafe { xlib::XNextEvent(self.dpy, &mut raw) };

            let event = match raw.get_type() {
                xlib::KeyPress => {
                    let ev = xlib::XKeyEvent::from(raw);
                    Some(XEvent::KeyPress(KeyPress {
                        keysym: self.primary_keysym(ev.keycode as u8),
                        mask: ev.state,
                    }))
                }
                xlib::MapRequest => {
                    let ev = xlib::XMapRequestEvent::from(raw);
                    Some(XEvent::MapRequest(Xid(ev.window as u32)))
                }
                xlib::DestroyNotify => {
                    let ev = xlib::XDestroyWindowEvent::from(raw);
                    Some(XEvent::Destroy(Xid(ev.window as u32)))
                }
                xlib::EnterNotify => {
                    let ev = xlib::XCrossingEvent::from(raw);
                    Some(XEvent::Enter(Xid(ev.window as u32)))
                }
                xlib::ConfigureRequest => {
                    let ev = xlib::XConfigureRequestEvent::from(raw);
                    Some(XEvent::ConfigureRequest(ConfigureRequest {
                        id: Xid(ev.window as u32),
                        x: ev.x,
                        y: ev.y,
                        w: ev.width as u32,
                        h: ev.height as u32,
                        border_px: ev.border_width as u32,
                        sibling: Xid(ev.above as u32),
                        stack_mode: ev.detail,
                        mask: ev.value_mask,
                    }))
                }
                xlib::ConfigureNotify => {
                    let ev = xlib::XConfigureEvent::from(raw);
                    Some(XEvent::ConfigureNotify(Xid(ev.window as u32)))
                }
                xlib::Expose => {
                    let ev = xlib::XExposeEvent::from(raw);
                    Some(XEvent::Expose(ExposeEvent {
                        id: Xid(ev.window as u32),
                        count: ev.count as usize,
                    }))
                }
                _ => None,
            };

            if let Some(event) = event {
                return Ok(event);
            }
        }
    }

    fn flush(&self) {
        unsafe {
            xlib::XFlush(self.dpy);
        }
    }

    fn map(&self, id: Xid) -> Result<()> {
        unsafe {
            xlib::XMapWindow(self.dpy, *id as c_ulong);
        }
        Ok(())
    }

    fn unmap(&self, id: Xid) -> Result<()> {
        unsafe {
            xlib::XUnmapWindow(self.dpy, *id as c_ulong);
        }
        Ok(())
    }

    fn raise(&self, id: Xid) -> Result<()> {
        unsafe {
            xlib::XRaiseWindow(self.dpy, *id as c_ulong);
        }
        Ok(())
    }

    fn focus(&self, id: Xid) -> Result<()> {
        unsafe {
            xlib::XSetInputFocus(
                self.dpy,
                *id as c_ulong,
                xlib::RevertToParent,
                xlib::CurrentTime,
            );
        }
        Ok(())
    }

    fn position(&self, id: Xid, r: Rect) -> Result<()> {
        unsafe {
            xlib::XMoveResizeWindow(self.dpy, *id as c_ulong, r.x as c_int, r.y as c_int, r.w, r.h);
        }
        Ok(())
    }

    fn set_border_width(&self, id: Xid, px: u32) -> Result<()> {
        unsafe {
            xlib::XSetWindowBorderWidth(self.dpy, *id as c_ulong, px);
        }
        Ok(())
    }

    fn set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        let pixel = self.pixel_for(color)?;
        unsafe {
            xlib::XSetWindowBorder(self.dpy, *id as c_ulong, pixel);
        }
        Ok(())
    }

    fn watch_enter(&self, id: Xid) -> Result<()> {
        unsafe {
            xlib::XSelectInput(self.dpy, *id as c_ulong, xlib::EnterWindowMask);
        }
        Ok(())
    }

    fn configure(&self, req: &ConfigureRequest) -> Result<()> {
        let mut changes = xlib::XWindowChanges {
            x: req.x,
            y: req.y,
            width: req.w as c_int,
            height: req.h as c_int,
            border_width: req.border_px as c_int,
            sibling: *req.sibling as c_ulong,
            stack_mode: req.stack_mode,
        };

        unsafe {
            xlib::XConfigureWindow(self.dpy, *req.id as c_ulong, req.mask as u32, &mut changes);
        }

        Ok(())
    }

    fn send_wm_delete(&self, id: Xid) -> Result<()> {
        let mut ev: xlib::XClientMessageEvent = unsafe { mem::zeroed() };
        ev.type_ = xlib::ClientMessage;
        ev.window = *id as c_ulong;
        ev.message_type = self.wm_protocols;
        ev.format = 32;
        ev.data.set_long(0, self.wm_delete as c_long);
        ev.data.set_long(1, xlib::CurrentTime as c_long);

        let mut raw = xlib::XEvent::from(ev);
        unsafe {
            xlib::XSendEvent(self.dpy, *id as c_ulong, xlib::False, xlib::NoEventMask, &mut raw);
        }

        Ok(())
    }

    fn root_children(&self) -> Result<Vec<Xid>> {
        let mut root_ret: xlib::Window = 0;
        let mut parent_ret: xlib::Window = 0;
        let mut children: *mut xlib::Window = ptr::null_mut();
        let mut n: u32 = 0;

        let ids = unsafe {
            let ok = xlib::XQueryTree(
                self.dpy,
                self.root,
                &mut root_ret,
                &mut parent_ret,
                &mut children,
                &mut n,
            );

            if ok == 0 || children.is_null() {
                return Ok(vec![]);
            }

            let ids: Vec<Xid> = slice::from_raw_parts(children, n as usize)
                .iter()
                .map(|&w| Xid(w as u32))
                .collect();
            xlib::XFree(children as *mut _);

            ids
        };

        // our own bar windows are children of root but are never clients
        let bars = self.bars.borrow();
        Ok(ids.into_iter().filter(|id| !bars.contains_key(id)).collect())
    }

    fn text_extent(&self, text: &str) -> Result<u32> {
        let c_text = CString::new(text).map_err(|_| Error::XRequest("text extent"))?;
        let mut ext: XGlyphInfo = unsafe { mem::zeroed() };

        unsafe {
            XftTextExtentsUtf8(
                self.dpy,
                self.font,
                c_text.as_ptr() as *const c_uchar,
                c_text.as_bytes().len() as c_int,
                &mut ext,
            );
        }

        Ok(ext.xOff as u32)
    }

    fn font_ascent(&self) -> u32 {
        unsafe { (*self.font).ascent as u32 }
    }

    fn fill_rect(&self, id: Xid, r: Rect, color: Color) -> Result<()> {
        let pixel = self.pixel_for(color)?;
        let bars = self.bars.borrow();
        let s = bars.get(&id).ok_or(Error::XRequest("unknown bar window"))?;

        unsafe {
            xlib::XSetForeground(self.dpy, s.gc, pixel);
            xlib::XFillRectangle(
                self.dpy,
                *id as c_ulong,
                s.gc,
                r.x as c_int,
                r.y as c_int,
                r.w,
                r.h,
            );
        }

        Ok(())
    }

    fn draw_text(&self, id: Xid, x: u32, y: u32, color: Color, text: &str) -> Result<()> {
        let xc = self.xft_color_for(color)?;
        let bars = self.bars.borrow();
        let s = bars.get(&id).ok_or(Error::XRequest("unknown bar window"))?;
        let c_text = CString::new(text).map_err(|_| Error::XRequest("draw text"))?;

        unsafe {
            XftDrawStringUtf8(
                s.draw,
                &xc,
                self.font,
                x as c_int,
                y as c_int,
                c_text.as_ptr() as *const c_uchar,
                c_text.as_bytes().len() as c_int,
            );
        }

        Ok(())
    }
}
