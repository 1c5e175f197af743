//! macOS 分布式通知（CoreFoundation FFI）

use std::ffi::{c_char, c_void, CString};
use std::ptr;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::THEME_CHANGED_NOTIFICATION;
use crate::error::{GatewayError, Result, ToggleError};
use crate::sync::SyncHandle;

type CFStringRef = *const c_void;
type CFTypeRef = *const c_void;
type CFNotificationCenterRef = *const c_void;
type CFRunLoopRef = *const c_void;
type CFRunLoopTimerRef = *const c_void;
type CFIndex = isize;

const K_CF_STRING_ENCODING_UTF8: u32 = 0x0800_0100;
/// CFNotificationSuspensionBehaviorDeliverImmediately
const CF_NOTIFICATION_DELIVER_IMMEDIATELY: CFIndex = 4;

/// 保活定时器：没有 timer 时 CFRunLoopRun 可能立即返回；
/// 顺带作为兜底信号，防止通知在后台线程上丢失
const KEEPALIVE_INTERVAL_SECS: f64 = 60.0;

/// 与 CoreFoundation 的 `CFRunLoopTimerContext` 布局一致
#[repr(C)]
struct TimerContext {
    version: CFIndex,
    info: *mut c_void,
    retain: *const c_void,
    release: *const c_void,
    copy_description: *const c_void,
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    static kCFRunLoopDefaultMode: CFStringRef;

    fn CFStringCreateWithCString(
        alloc: *const c_void,
        c_str: *const c_char,
        encoding: u32,
    ) -> CFStringRef;
    fn CFRelease(cf: CFTypeRef);

    fn CFNotificationCenterGetDistributedCenter() -> CFNotificationCenterRef;
    fn CFNotificationCenterPostNotification(
        center: CFNotificationCenterRef,
        name: CFStringRef,
        object: *const c_void,
        user_info: *const c_void,
        deliver_immediately: u8,
    );
    fn CFNotificationCenterAddObserver(
        center: CFNotificationCenterRef,
        observer: *const c_void,
        callback: unsafe extern "C" fn(
            CFNotificationCenterRef,
            *const c_void,
            CFStringRef,
            *const c_void,
            *const c_void,
        ),
        name: CFStringRef,
        object: *const c_void,
        suspension_behavior: CFIndex,
    );
    fn CFNotificationCenterRemoveEveryObserver(
        center: CFNotificationCenterRef,
        observer: *const c_void,
    );

    fn CFRunLoopGetCurrent() -> CFRunLoopRef;
    fn CFRunLoopRun();
    fn CFRunLoopStop(rl: CFRunLoopRef);

    fn CFAbsoluteTimeGetCurrent() -> f64;
    fn CFRunLoopTimerCreate(
        allocator: *const c_void,
        fire_date: f64,
        interval: f64,
        flags: u64,
        order: CFIndex,
        callout: unsafe extern "C" fn(CFRunLoopTimerRef, *mut c_void),
        context: *const TimerContext,
    ) -> CFRunLoopTimerRef;
    fn CFRunLoopAddTimer(rl: CFRunLoopRef, timer: CFRunLoopTimerRef, mode: CFStringRef);
    fn CFRunLoopTimerInvalidate(timer: CFRunLoopTimerRef);
}

// 分布式通知中心的 Mach port 实现在 Foundation 里
#[link(name = "Foundation", kind = "framework")]
extern "C" {}

/// 自有的 CFString，drop 时释放
struct CfString(CFStringRef);

impl CfString {
    fn new(s: &str) -> Option<Self> {
        let c_str = CString::new(s).ok()?;
        // SAFETY: `c_str` 是合法的以 NUL 结尾的 C 字符串
        let raw = unsafe {
            CFStringCreateWithCString(ptr::null(), c_str.as_ptr(), K_CF_STRING_ENCODING_UTF8)
        };
        if raw.is_null() {
            None
        } else {
            Some(Self(raw))
        }
    }
}

impl Drop for CfString {
    fn drop(&mut self) {
        // SAFETY: 由 CFStringCreateWithCString 创建，只释放一次
        unsafe { CFRelease(self.0) }
    }
}

pub fn post_theme_changed() -> std::result::Result<(), GatewayError> {
    let name = CfString::new(THEME_CHANGED_NOTIFICATION)
        .ok_or_else(|| GatewayError::Broadcast("cannot create notification name".to_string()))?;

    // SAFETY: center 做了空指针检查，name 在调用期间有效
    unsafe {
        let center = CFNotificationCenterGetDistributedCenter();
        if center.is_null() {
            return Err(GatewayError::Broadcast(
                "distributed notification center unavailable".to_string(),
            ));
        }
        CFNotificationCenterPostNotification(center, name.0, ptr::null(), ptr::null(), 1);
    }
    tracing::debug!("posted {}", THEME_CHANGED_NOTIFICATION);
    Ok(())
}

/// 可以跨线程停止的 CFRunLoop
pub struct RunLoopStopper(CFRunLoopRef);

// SAFETY: 只用于 CFRunLoopStop，Apple 文档说明它是线程安全的
unsafe impl Send for RunLoopStopper {}
// SAFETY: 同上
unsafe impl Sync for RunLoopStopper {}

impl RunLoopStopper {
    /// CFRunLoopStop 在 run loop 尚未进入 CFRunLoopRun 时不生效，所以重复发送直到线程结束
    pub fn stop_until_finished(&self, thread: &JoinHandle<()>) {
        for _ in 0..200 {
            // SAFETY: 见 RunLoopStopper 的 Send/Sync 说明
            unsafe { CFRunLoopStop(self.0) };
            if thread.is_finished() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        tracing::warn!("listener run loop did not stop in time");
    }
}

/// 通知回调：只转发信号，值由状态机重新查询
unsafe extern "C" fn on_notification(
    _center: CFNotificationCenterRef,
    observer: *const c_void,
    _name: CFStringRef,
    _object: *const c_void,
    _user_info: *const c_void,
) {
    // SAFETY: observer 是 Box<SyncHandle> 泄漏出来的指针，
    // 在 CFNotificationCenterRemoveEveryObserver 之后才回收
    let handle = unsafe { &*observer.cast::<SyncHandle>() };
    tracing::debug!("received {}", THEME_CHANGED_NOTIFICATION);
    handle.signal();
}

unsafe extern "C" fn on_keepalive(_timer: CFRunLoopTimerRef, info: *mut c_void) {
    // SAFETY: info 与 observer 是同一个 Box<SyncHandle>
    let handle = unsafe { &*(info as *const SyncHandle) };
    handle.signal();
}

/// 启动监听线程，返回 run loop 停止器与线程句柄
pub fn spawn_observer(handle: SyncHandle) -> Result<(RunLoopStopper, JoinHandle<()>)> {
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Option<RunLoopStopper>>(1);

    let thread = thread::Builder::new()
        .name("theme-listener".to_string())
        .spawn(move || {
            let Some(name) = CfString::new(THEME_CHANGED_NOTIFICATION) else {
                let _ = ready_tx.send(None);
                return;
            };

            // SAFETY: 所有 CF 调用成对出现（add/remove、create/release）；
            // ctx_ptr 通过 Box::into_raw 泄漏，run loop 退出后用 Box::from_raw 回收
            unsafe {
                let center = CFNotificationCenterGetDistributedCenter();
                if center.is_null() {
                    let _ = ready_tx.send(None);
                    return;
                }

                let run_loop = CFRunLoopGetCurrent();
                let ctx_ptr = Box::into_raw(Box::new(handle));

                CFNotificationCenterAddObserver(
                    center,
                    ctx_ptr.cast(),
                    on_notification,
                    name.0,
                    ptr::null(),
                    CF_NOTIFICATION_DELIVER_IMMEDIATELY,
                );

                let timer_ctx = TimerContext {
                    version: 0,
                    info: ctx_ptr.cast::<c_void>(),
                    retain: ptr::null(),
                    release: ptr::null(),
                    copy_description: ptr::null(),
                };
                let timer = CFRunLoopTimerCreate(
                    ptr::null(),
                    CFAbsoluteTimeGetCurrent() + KEEPALIVE_INTERVAL_SECS,
                    KEEPALIVE_INTERVAL_SECS,
                    0,
                    0,
                    on_keepalive,
                    &timer_ctx,
                );
                CFRunLoopAddTimer(run_loop, timer, kCFRunLoopDefaultMode);

                let _ = ready_tx.send(Some(RunLoopStopper(run_loop)));

                // 阻塞直到 CFRunLoopStop
                CFRunLoopRun();

                CFRunLoopTimerInvalidate(timer);
                CFRelease(timer);
                CFNotificationCenterRemoveEveryObserver(center, ctx_ptr.cast());
                drop(Box::from_raw(ctx_ptr));
            }
        })?;

    match ready_rx.recv() {
        Ok(Some(stopper)) => Ok((stopper, thread)),
        _ => {
            let _ = thread.join();
            Err(ToggleError::listener(
                "could not register for appearance notifications",
            ))
        }
    }
}
