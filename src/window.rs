use std::sync::{Arc, Mutex, MutexGuard};

use windows::core::PCWSTR;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::CreateMutexW;
use windows::Win32::UI::Accessibility::HWINEVENTHOOK;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::banner::{self, BannerView, DIES_LABEL, MILIDIES_LABEL, TITLE};
use crate::config::Config;
use crate::dom::{Element, MemoryDocument, Navigator, SystemNavigator};
use crate::native_interop::{self, Color, TIMER_POLL, WM_APP_BANNER_UPDATED};
use crate::poller::ApiClient;
use crate::theme::Palette;

/// Wrapper to make HWND sendable across threads (safe for PostMessage usage)
#[derive(Clone, Copy)]
struct SendHwnd(isize);

unsafe impl Send for SendHwnd {}

impl SendHwnd {
    fn from_hwnd(hwnd: HWND) -> Self {
        Self(hwnd.0 as isize)
    }
    fn to_hwnd(self) -> HWND {
        HWND(self.0 as *mut _)
    }
}

struct AppState {
    hwnd: SendHwnd,
    taskbar_hwnd: Option<HWND>,
    tray_notify_hwnd: Option<HWND>,
    win_event_hook: Option<HWINEVENTHOOK>,
    palette: Palette,
    embedded: bool,

    config: Arc<Config>,
    client: ApiClient,
    document: Arc<Mutex<MemoryDocument>>,
}

impl AppState {
    fn banner_element(&self) -> Option<Element> {
        let document = self.document.lock().unwrap_or_else(|e| e.into_inner());
        document.element(&self.config.banner_element_id).cloned()
    }

    /// What to paint right now; placeholders until the first poll lands.
    fn banner_view(&self) -> BannerView {
        self.banner_element()
            .and_then(|e| e.banner().cloned())
            .unwrap_or_else(BannerView::unavailable)
    }
}

const IDM_REFRESH: u16 = 1;
const IDM_EXIT: u16 = 2;
const IDM_EXPLANATION: u16 = 3;

unsafe impl Send for AppState {}

static STATE: Mutex<Option<AppState>> = Mutex::new(None);

/// Lock STATE safely, recovering from poisoned mutex
fn lock_state() -> MutexGuard<'static, Option<AppState>> {
    STATE.lock().unwrap_or_else(|e| e.into_inner())
}

const LEFT_DIVIDER_W: i32 = 3;
const DIVIDER_RIGHT_MARGIN: i32 = 10;
const CONTENT_W: i32 = 129;
const RIGHT_MARGIN: i32 = 4;
const WIDGET_HEIGHT: i32 = 46;

const TITLE_Y: i32 = 3;
const VALUE_Y: i32 = 17;
const ROW_H: i32 = 14;
const VALUE_W: i32 = 64;

const BAR_Y: i32 = 35;
const SEGMENT_COUNT: i32 = 10;
const SEGMENT_GAP: i32 = 1;
const SEGMENT_W: i32 = (CONTENT_W - (SEGMENT_COUNT - 1) * SEGMENT_GAP) / SEGMENT_COUNT;
const SEGMENT_H: i32 = 5;
const CORNER_RADIUS: i32 = 2;

fn total_widget_width() -> i32 {
    LEFT_DIVIDER_W + DIVIDER_RIGHT_MARGIN + CONTENT_W + RIGHT_MARGIN
}

pub fn run(config: Arc<Config>, client: ApiClient) -> windows::core::Result<()> {
    // Single-instance guard: silently exit if another banner is running
    let mutex_name = native_interop::wide_str("Global\\AstronomicalWatchBanner");
    let _mutex = unsafe {
        let handle = CreateMutexW(None, false, PCWSTR::from_raw(mutex_name.as_ptr()))?;
        if GetLastError() == ERROR_ALREADY_EXISTS {
            log::info!("Another banner instance is already running");
            return Ok(());
        }
        handle
    };

    let class_name = native_interop::wide_str("AstronomicalWatchBanner");

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null())?;

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: HINSTANCE(hinstance.0),
            hCursor: LoadCursorW(HINSTANCE::default(), IDC_HAND).unwrap_or_default(),
            hbrBackground: HBRUSH(std::ptr::null_mut()),
            lpszClassName: PCWSTR::from_raw(class_name.as_ptr()),
            ..Default::default()
        };

        RegisterClassExW(&wc);

        // Create as layered popup (will be reparented into taskbar)
        let title = native_interop::wide_str(TITLE);
        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW | WS_EX_LAYERED | WS_EX_NOACTIVATE,
            PCWSTR::from_raw(class_name.as_ptr()),
            PCWSTR::from_raw(title.as_ptr()),
            WS_POPUP,
            0,
            0,
            total_widget_width(),
            WIDGET_HEIGHT,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )?;

        let poll_interval_ms = u32::try_from(config.poll_interval_ms).unwrap_or(u32::MAX);
        let document = Arc::new(Mutex::new(MemoryDocument::with_elements(&[
            config.banner_element_id.as_str(),
        ])));

        {
            let mut state = lock_state();
            *state = Some(AppState {
                hwnd: SendHwnd::from_hwnd(hwnd),
                taskbar_hwnd: None,
                tray_notify_hwnd: None,
                win_event_hook: None,
                palette: Palette::current(),
                embedded: false,
                config,
                client,
                document,
            });
        }

        let mut embedded = false;
        if let Some(taskbar_hwnd) = native_interop::find_taskbar() {
            native_interop::embed_in_taskbar(hwnd, taskbar_hwnd);
            embedded = true;

            let tray_notify = native_interop::find_child_window(taskbar_hwnd, "TrayNotifyWnd");
            let hook = tray_notify.and_then(|tray_hwnd| {
                let thread_id = native_interop::get_window_thread_id(tray_hwnd);
                native_interop::set_tray_event_hook(thread_id, on_tray_location_changed)
            });

            let mut state = lock_state();
            if let Some(s) = state.as_mut() {
                s.taskbar_hwnd = Some(taskbar_hwnd);
                s.embedded = true;
                s.tray_notify_hwnd = tray_notify;
                s.win_event_hook = hook;
            }
        } else {
            log::warn!("Taskbar not found, showing the banner as a topmost popup");
        }

        // If not embedded, fall back to topmost popup with SetLayeredWindowAttributes
        if !embedded {
            let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 255, LWA_ALPHA);
            let _ = SetWindowPos(
                hwnd,
                HWND_TOPMOST,
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }

        position_at_taskbar();
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
        render_layered();

        SetTimer(hwnd, TIMER_POLL, poll_interval_ms, None);

        // Initial poll
        spawn_poll(SendHwnd::from_hwnd(hwnd));

        // Message loop
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    Ok(())
}

/// Every poll gets its own thread; a slow response may land after a newer one.
fn spawn_poll(send_hwnd: SendHwnd) {
    std::thread::spawn(move || {
        do_poll(send_hwnd);
    });
}

fn do_poll(send_hwnd: SendHwnd) {
    let hwnd = send_hwnd.to_hwnd();

    let (client, config, document) = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => (s.client.clone(), Arc::clone(&s.config), Arc::clone(&s.document)),
            None => return,
        }
    };

    banner::refresh(&client, &*document, &config);

    unsafe {
        let _ = PostMessageW(hwnd, WM_APP_BANNER_UPDATED, WPARAM(0), LPARAM(0));
    }
}

fn click_banner() {
    let (element, page) = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => (s.banner_element(), s.config.explanation_page_url.clone()),
            None => return,
        }
    };

    let Some(element) = element else {
        return;
    };
    if let Err(e) = element.click(&mut SystemNavigator) {
        log::warn!("Failed to open {page}: {e}");
    }
}

/// Opens the explanation page even before the first render attached a handler.
fn open_explanation() {
    let page = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => s.config.explanation_page_url.clone(),
            None => return,
        }
    };
    if let Err(e) = SystemNavigator.open_new_context(&page) {
        log::warn!("Failed to open {page}: {e}");
    }
}

/// Render widget content and push to the layered window via UpdateLayeredWindow.
/// Renders fully opaque with the actual taskbar background colour so that
/// ClearType sub-pixel font rendering can be used for crisp, OS-native text.
fn render_layered() {
    let (hwnd_val, palette, embedded, view) = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => (s.hwnd, s.palette, s.embedded, s.banner_view()),
            None => return,
        }
    };

    let hwnd = hwnd_val.to_hwnd();

    if !embedded {
        unsafe {
            let _ = InvalidateRect(hwnd, None, false);
        }
        return;
    }

    let width = total_widget_width();
    let height = WIDGET_HEIGHT;

    unsafe {
        let screen_dc = GetDC(hwnd);

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: 0, // BI_RGB
                ..Default::default()
            },
            ..Default::default()
        };

        let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
        let mem_dc = CreateCompatibleDC(screen_dc);
        let dib = CreateDIBSection(mem_dc, &bmi, DIB_RGB_COLORS, &mut bits, None, 0)
            .unwrap_or_default();

        if dib.is_invalid() || bits.is_null() {
            let _ = DeleteDC(mem_dc);
            ReleaseDC(hwnd, screen_dc);
            return;
        }

        let old_bmp = SelectObject(mem_dc, dib);
        let pixel_count = (width * height) as usize;

        paint_content(mem_dc, width, height, &palette, &view);

        // Background pixels get alpha 1 so the whole banner stays clickable
        let bg_bgr = palette.background.to_colorref();
        let pixel_data = std::slice::from_raw_parts_mut(bits as *mut u32, pixel_count);
        for px in pixel_data.iter_mut() {
            let rgb = *px & 0x00FFFFFF;
            if rgb == bg_bgr {
                *px = 0x01000000;
            } else {
                *px = rgb | 0xFF000000;
            }
        }

        let pt_src = POINT { x: 0, y: 0 };
        let sz = SIZE {
            cx: width,
            cy: height,
        };
        let blend = BLENDFUNCTION {
            BlendOp: 0, // AC_SRC_OVER
            BlendFlags: 0,
            SourceConstantAlpha: 255,
            AlphaFormat: 1, // AC_SRC_ALPHA
        };

        let _ = UpdateLayeredWindow(
            hwnd,
            screen_dc,
            None,
            Some(&sz),
            mem_dc,
            Some(&pt_src),
            COLORREF(0),
            Some(&blend),
            ULW_ALPHA,
        );

        SelectObject(mem_dc, old_bmp);
        let _ = DeleteObject(dib);
        let _ = DeleteDC(mem_dc);
        ReleaseDC(hwnd, screen_dc);
    }
}

fn create_font(height: i32, weight: FONT_WEIGHT) -> HFONT {
    let font_name = native_interop::wide_str("Segoe UI");
    unsafe {
        CreateFontW(
            height,
            0,
            0,
            0,
            weight.0 as i32,
            0,
            0,
            0,
            DEFAULT_CHARSET.0 as u32,
            OUT_TT_PRECIS.0 as u32,
            CLIP_DEFAULT_PRECIS.0 as u32,
            CLEARTYPE_QUALITY.0 as u32,
            (DEFAULT_PITCH.0 | FF_DONTCARE.0) as u32,
            PCWSTR::from_raw(font_name.as_ptr()),
        )
    }
}

/// Paint title, time value, labels and progress bar onto a DC.
fn paint_content(hdc: HDC, width: i32, height: i32, palette: &Palette, view: &BannerView) {
    unsafe {
        let client_rect = RECT {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        };

        fill_rect(hdc, &client_rect, &palette.background);

        // Left divider
        let divider_top = (height - 25) / 2;
        let divider_bottom = divider_top + 25;
        fill_rect(
            hdc,
            &RECT { left: 0, top: divider_top, right: 2, bottom: divider_bottom },
            &palette.divider_light,
        );
        fill_rect(
            hdc,
            &RECT { left: 2, top: divider_top, right: 3, bottom: divider_bottom },
            &palette.divider_dark,
        );

        let x = LEFT_DIVIDER_W + DIVIDER_RIGHT_MARGIN;
        let _ = SetBkMode(hdc, TRANSPARENT);

        let small = create_font(-11, FW_NORMAL);
        let bold = create_font(-13, FW_SEMIBOLD);

        let old_font = SelectObject(hdc, small);
        let _ = SetTextColor(hdc, COLORREF(palette.title.to_colorref()));
        draw_text(hdc, TITLE, x, TITLE_Y, CONTENT_W, DT_LEFT);

        SelectObject(hdc, bold);
        let _ = SetTextColor(hdc, COLORREF(palette.value.to_colorref()));
        draw_text(hdc, &view.time_text(), x, VALUE_Y, VALUE_W, DT_LEFT);

        SelectObject(hdc, small);
        let _ = SetTextColor(hdc, COLORREF(palette.label.to_colorref()));
        let labels = format!("{DIES_LABEL} \u{00b7} {MILIDIES_LABEL}");
        draw_text(hdc, &labels, x + VALUE_W, VALUE_Y, CONTENT_W - VALUE_W, DT_RIGHT);

        draw_progress(hdc, x, BAR_Y, view.progress_fraction(), palette);

        SelectObject(hdc, old_font);
        let _ = DeleteObject(small);
        let _ = DeleteObject(bold);
    }
}

fn draw_text(hdc: HDC, text: &str, x: i32, y: i32, w: i32, align: DRAW_TEXT_FORMAT) {
    let mut wide: Vec<u16> = text.encode_utf16().collect();
    let mut rect = RECT {
        left: x,
        top: y,
        right: x + w,
        bottom: y + ROW_H,
    };
    unsafe {
        let _ = DrawTextW(hdc, &mut wide, &mut rect, align | DT_VCENTER | DT_SINGLELINE);
    }
}

/// Segmented bar; the fraction is already bounded to [0, 1].
fn draw_progress(hdc: HDC, x: i32, y: i32, fraction: f64, palette: &Palette) {
    let percent = fraction * 100.0;
    let step = 100.0 / SEGMENT_COUNT as f64;

    for i in 0..SEGMENT_COUNT {
        let seg_x = x + i * (SEGMENT_W + SEGMENT_GAP);
        let seg_start = i as f64 * step;
        let seg_end = seg_start + step;

        let seg_rect = RECT {
            left: seg_x,
            top: y,
            right: seg_x + SEGMENT_W,
            bottom: y + SEGMENT_H,
        };

        if percent >= seg_end {
            draw_rounded_rect(hdc, &seg_rect, &palette.accent, CORNER_RADIUS);
        } else if percent <= seg_start {
            draw_rounded_rect(hdc, &seg_rect, &palette.track, CORNER_RADIUS);
        } else {
            draw_rounded_rect(hdc, &seg_rect, &palette.track, CORNER_RADIUS);
            let fill_width = (SEGMENT_W as f64 * (percent - seg_start) / step) as i32;
            if fill_width > 0 {
                unsafe {
                    let rgn = CreateRoundRectRgn(
                        seg_rect.left,
                        seg_rect.top,
                        seg_rect.right + 1,
                        seg_rect.bottom + 1,
                        CORNER_RADIUS * 2,
                        CORNER_RADIUS * 2,
                    );
                    let _ = SelectClipRgn(hdc, rgn);
                    fill_rect(
                        hdc,
                        &RECT { right: seg_x + fill_width, ..seg_rect },
                        &palette.accent,
                    );
                    let _ = SelectClipRgn(hdc, HRGN::default());
                    let _ = DeleteObject(rgn);
                }
            }
        }
    }
}

fn fill_rect(hdc: HDC, rect: &RECT, color: &Color) {
    unsafe {
        let brush = CreateSolidBrush(COLORREF(color.to_colorref()));
        FillRect(hdc, rect, brush);
        let _ = DeleteObject(brush);
    }
}

fn draw_rounded_rect(hdc: HDC, rect: &RECT, color: &Color, radius: i32) {
    unsafe {
        let brush = CreateSolidBrush(COLORREF(color.to_colorref()));
        let rgn = CreateRoundRectRgn(
            rect.left,
            rect.top,
            rect.right + 1,
            rect.bottom + 1,
            radius * 2,
            radius * 2,
        );
        let _ = FillRgn(hdc, rgn, brush);
        let _ = DeleteObject(rgn);
        let _ = DeleteObject(brush);
    }
}

fn check_theme_change() {
    let palette = Palette::current();
    let changed = {
        let mut state = lock_state();
        match state.as_mut() {
            Some(s) if s.palette.is_dark != palette.is_dark => {
                s.palette = palette;
                true
            }
            _ => false,
        }
    };
    if changed {
        render_layered();
    }
}

fn position_at_taskbar() {
    let state = lock_state();
    let s = match state.as_ref() {
        Some(s) => s,
        None => return,
    };

    let hwnd = s.hwnd.to_hwnd();
    let embedded = s.embedded;

    let taskbar_hwnd = match s.taskbar_hwnd {
        Some(h) => h,
        None => return,
    };

    let taskbar_rect = match native_interop::get_taskbar_rect(taskbar_hwnd) {
        Some(r) => r,
        None => return,
    };

    let taskbar_height = taskbar_rect.bottom - taskbar_rect.top;
    let mut tray_left = taskbar_rect.right;

    if let Some(tray_hwnd) = native_interop::find_child_window(taskbar_hwnd, "TrayNotifyWnd") {
        if let Some(tray_rect) = native_interop::get_window_rect_safe(tray_hwnd) {
            tray_left = tray_rect.left;
        }
    }

    let widget_width = total_widget_width();

    if embedded {
        // Child window: coordinates relative to parent (taskbar)
        let x = tray_left - taskbar_rect.left - widget_width;
        let y = (taskbar_height - WIDGET_HEIGHT) / 2;
        native_interop::move_window(hwnd, x, y, widget_width, WIDGET_HEIGHT);
    } else {
        // Topmost popup: screen coordinates
        let x = tray_left - widget_width;
        let y = taskbar_rect.top + (taskbar_height - WIDGET_HEIGHT) / 2;
        native_interop::move_window(hwnd, x, y, widget_width, WIDGET_HEIGHT);
    }
}

/// WinEvent callback for tray icon location changes
unsafe extern "system" fn on_tray_location_changed(
    _hook: HWINEVENTHOOK,
    _event: u32,
    hwnd: HWND,
    _id_object: i32,
    _id_child: i32,
    _thread: u32,
    _time: u32,
) {
    static LAST_REPOSITION: Mutex<Option<std::time::Instant>> = Mutex::new(None);

    let is_tray = {
        let state = lock_state();
        state
            .as_ref()
            .and_then(|s| s.tray_notify_hwnd)
            .map(|h| h == hwnd)
            .unwrap_or(false)
    };

    if is_tray {
        let should_reposition = {
            let mut last = LAST_REPOSITION.lock().unwrap_or_else(|e| e.into_inner());
            let now = std::time::Instant::now();
            if last
                .map(|t| now.duration_since(t).as_millis() > 500)
                .unwrap_or(true)
            {
                *last = Some(now);
                true
            } else {
                false
            }
        };
        if should_reposition {
            position_at_taskbar();
        }
    }
}

fn quit() {
    let hook = {
        let state = lock_state();
        state.as_ref().and_then(|s| s.win_event_hook)
    };
    if let Some(h) = hook {
        native_interop::unhook_win_event(h);
    }
    unsafe {
        PostQuitMessage(0);
    }
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            let embedded = {
                let state = lock_state();
                state.as_ref().map(|s| s.embedded).unwrap_or(false)
            };
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            // Layered windows are pushed by render_layered instead
            if !embedded {
                paint(hdc, hwnd);
            }
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        WM_ERASEBKGND => LRESULT(1),
        WM_DISPLAYCHANGE => {
            position_at_taskbar();
            LRESULT(0)
        }
        WM_TIMER => {
            if wparam.0 == TIMER_POLL {
                spawn_poll(SendHwnd::from_hwnd(hwnd));
            }
            LRESULT(0)
        }
        WM_APP_BANNER_UPDATED => {
            check_theme_change();
            render_layered();
            LRESULT(0)
        }
        WM_LBUTTONUP => {
            click_banner();
            LRESULT(0)
        }
        WM_RBUTTONUP => {
            show_context_menu(hwnd);
            LRESULT(0)
        }
        WM_COMMAND => {
            match wparam.0 as u16 {
                IDM_REFRESH => spawn_poll(SendHwnd::from_hwnd(hwnd)),
                IDM_EXPLANATION => open_explanation(),
                IDM_EXIT => quit(),
                _ => {}
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            quit();
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn show_context_menu(hwnd: HWND) {
    unsafe {
        let Ok(menu) = CreatePopupMenu() else {
            return;
        };

        let append = |id: u16, label: &str| {
            let label = native_interop::wide_str(label);
            let _ = AppendMenuW(
                menu,
                MENU_ITEM_FLAGS(0),
                id as usize,
                PCWSTR::from_raw(label.as_ptr()),
            );
        };

        append(IDM_REFRESH, "Refresh");
        append(IDM_EXPLANATION, "What is this?");
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());

        let version_str = native_interop::wide_str(&format!("v{}", env!("CARGO_PKG_VERSION")));
        let _ = AppendMenuW(menu, MF_GRAYED, 0, PCWSTR::from_raw(version_str.as_ptr()));

        append(IDM_EXIT, "Exit");

        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);
        let _ = SetForegroundWindow(hwnd);
        let _ = TrackPopupMenu(menu, TPM_RIGHTBUTTON, pt.x, pt.y, 0, hwnd, None);
        let _ = DestroyMenu(menu);
    }
}

/// Paint for non-embedded fallback (normal WM_PAINT path)
fn paint(hdc: HDC, hwnd: HWND) {
    let (palette, view) = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => (s.palette, s.banner_view()),
            None => return,
        }
    };

    unsafe {
        let mut client_rect = RECT::default();
        let _ = GetClientRect(hwnd, &mut client_rect);
        let width = client_rect.right - client_rect.left;
        let height = client_rect.bottom - client_rect.top;

        if width <= 0 || height <= 0 {
            return;
        }

        let mem_dc = CreateCompatibleDC(hdc);
        let mem_bmp = CreateCompatibleBitmap(hdc, width, height);
        let old_bmp = SelectObject(mem_dc, mem_bmp);

        paint_content(mem_dc, width, height, &palette, &view);

        let _ = BitBlt(hdc, 0, 0, width, height, mem_dc, 0, 0, SRCCOPY);

        SelectObject(mem_dc, old_bmp);
        let _ = DeleteObject(mem_bmp);
        let _ = DeleteDC(mem_dc);
    }
}
