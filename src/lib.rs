// The editing and scrolling machinery is forked from cursive_core's EditView

/*
Copyright (c) 2015 Alexandre Bury

Permission is hereby granted, free of charge, to any person obtaining a copy of this
software and associated documentation files (the "Software"), to deal in the Software
without restriction, including without limitation the rights to use, copy, modify,
merge, publish, distribute, sublicense, and/or sell copies of the Software, and
to permit persons to whom the Software is furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in
all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR
PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE
OR OTHER DEALINGS IN THE SOFTWARE.
*/

mod secret_content;
mod storage;

use cursive_core::{
    direction::Direction,
    event::{Callback, Event, EventResult, Key, MouseEvent},
    immut2, impl_enabled,
    theme::{Effect, PaletteStyle, StyleType},
    utils::lines::simple::{simple_prefix, simple_suffix},
    view::CannotFocus,
    Cursive, Printer, Rect, Vec2, View, With,
};
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

pub use self::secret_content::SecretContent;

/// Closure type for callbacks when the content is modified.
///
/// Arguments are the `Cursive`, and current cursor position
pub type OnEdit = dyn Fn(&mut Cursive, usize);

/// Closure type for callbacks when Enter is pressed.
///
/// The committed value is not passed along; the caller reads it through its
/// own [`SecretContent`] handle.
pub type OnSubmit = dyn Fn(&mut Cursive);

/// Width of the leading decoration box, in columns.
const LEFT_VIEW_WIDTH: usize = 2;

/// Labels for the reveal toggle. `SHOW` is drawn while the content is masked,
/// `HIDE` while it is revealed; both must be the same width so the control
/// does not jump around when toggled.
const SHOW_LABEL: &str = "<Show>";
const HIDE_LABEL: &str = "<Hide>";
const TOGGLE_WIDTH: usize = SHOW_LABEL.len();

/// A single-line secret input that can toggle between masked and revealed
/// display.
///
/// The field shows its placeholder label while the bound [`SecretContent`] is
/// empty. As soon as the content is non-empty, a `<Show>`/`<Hide>` control
/// appears at the trailing edge; clicking it (or pressing `Ctrl+R`) flips the
/// display mode without touching the content, cursor or focus. A fresh view
/// always starts masked.
///
/// The value lives in a caller-supplied [`SecretContent`] cell, so edits made
/// through the view are immediately observable by the caller and vice versa.
pub struct TogglableSecretField {
    /// Placeholder label, drawn while the content is empty.
    label: String,

    /// Shared binding to the secret value.
    content: SecretContent,

    /// Whether the content is currently shown in clear text.
    ///
    /// Lives as long as the view instance: recreating the view resets it,
    /// content changes do not.
    visible: bool,

    /// Cursor position in the content, in bytes.
    cursor: usize,

    /// Number of bytes to skip at the beginning of the content.
    ///
    /// (When the content is too long for the display, we hide part of it)
    offset: usize,

    /// Last display length of the edit area, to know the possible offset range
    last_length: usize,

    /// Last total width the view was laid out with.
    last_width: usize,

    /// Optional leading decoration, drawn in a fixed 2x1 box left of the
    /// input.
    left_view: Option<Box<dyn View>>,

    /// Callback when the content is modified.
    ///
    /// Will be called with the current cursor position.
    on_edit: Option<Rc<OnEdit>>,

    /// Callback when `<Enter>` is pressed.
    on_submit: Option<Rc<OnSubmit>>,

    /// When disabled, revealed text is drawn without the reversed field
    /// styling. In a character-cell terminal every glyph is monospaced
    /// anyway, so this is only a rendering hint.
    monospaced_font: bool,

    /// Character to fill empty space
    filler: String,

    enabled: bool,

    style: StyleType,
}

impl TogglableSecretField {
    impl_enabled!(self.enabled);

    /// Creates a new field with the given placeholder label, bound to
    /// `content`.
    ///
    /// The field starts masked, with the cursor at the end of any existing
    /// content.
    pub fn new(label: impl Into<String>, content: SecretContent) -> Self {
        let cursor = content.len();
        TogglableSecretField {
            label: label.into(),
            content,
            visible: false,
            cursor,
            offset: 0,
            last_length: 0,
            last_width: 0,
            left_view: None,
            on_edit: None,
            on_submit: None,
            monospaced_font: true,
            filler: "_".to_string(),
            enabled: true,
            style: PaletteStyle::Secondary.into(),
        }
    }

    /// Returns true while the content is displayed in clear text.
    pub fn is_revealed(&self) -> bool {
        self.visible
    }

    /// Sets the leading decoration view, drawn in a fixed 2x1 box left of
    /// the input. Without one, no space is reserved.
    pub fn set_left_view<V: View>(&mut self, view: V) {
        self.left_view = Some(Box::new(view));
    }

    /// Sets the leading decoration view.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn left_view<V: View>(self, view: V) -> Self {
        self.with(|s| s.set_left_view(view))
    }

    /// Enables or disables the monospaced rendering hint for revealed text.
    ///
    /// Enabled by default.
    pub fn set_use_monospaced_font(&mut self, monospaced: bool) {
        self.monospaced_font = monospaced;
    }

    /// Enables or disables the monospaced rendering hint for revealed text.
    ///
    /// Chainable variant; returns a reconfigured copy.
    #[must_use]
    pub fn use_monospaced_font(self, monospaced: bool) -> Self {
        self.with(|s| s.set_use_monospaced_font(monospaced))
    }

    /// Sets the style used for this view.
    ///
    /// When the view is enabled, the style will be reversed.
    ///
    /// Defaults to `ColorStyle::Secondary`.
    pub fn set_style<S: Into<StyleType>>(&mut self, style: S) {
        self.style = style.into();
    }

    /// Sets the style used for this view.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn style<S: Into<StyleType>>(self, style: S) -> Self {
        self.with(|s| s.set_style(style))
    }

    /// Sets a mutable callback to be called whenever the content is modified.
    ///
    /// `callback` will be called with the current cursor position.
    ///
    /// *Warning*: this callback cannot be called recursively. If you somehow
    /// trigger this callback again in the given closure, it will be ignored.
    ///
    /// If you don't need a mutable closure but want the possibility of
    /// recursive calls, see [`set_on_edit`](#method.set_on_edit).
    pub fn set_on_edit_mut<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Cursive, usize) + 'static,
    {
        self.set_on_edit(immut2!(callback));
    }

    /// Sets a callback to be called whenever the content is modified.
    ///
    /// `callback` will be called with the current cursor position.
    ///
    /// This callback can safely trigger itself recursively if needed
    /// (for instance if you call `on_event` on this view from the callback).
    ///
    /// If you need a mutable closure and don't care about the recursive
    /// aspect, see [`set_on_edit_mut`](#method.set_on_edit_mut).
    pub fn set_on_edit<F>(&mut self, callback: F)
    where
        F: Fn(&mut Cursive, usize) + 'static,
    {
        self.on_edit = Some(Rc::new(callback));
    }

    /// Sets a mutable callback to be called whenever the content is modified.
    ///
    /// Chainable variant. See [`set_on_edit_mut`](#method.set_on_edit_mut).
    #[must_use]
    pub fn on_edit_mut<F>(self, callback: F) -> Self
    where
        F: FnMut(&mut Cursive, usize) + 'static,
    {
        self.with(|v| v.set_on_edit_mut(callback))
    }

    /// Sets a callback to be called whenever the content is modified.
    ///
    /// Chainable variant. See [`set_on_edit`](#method.set_on_edit).
    #[must_use]
    pub fn on_edit<F>(self, callback: F) -> Self
    where
        F: Fn(&mut Cursive, usize) + 'static,
    {
        self.with(|v| v.set_on_edit(callback))
    }

    /// Sets a mutable callback to be called when `<Enter>` is pressed.
    ///
    /// *Warning*: this callback cannot be called recursively. If you somehow
    /// trigger this callback again in the given closure, it will be ignored.
    ///
    /// If you don't need a mutable closure but want the possibility of
    /// recursive calls, see [`set_on_submit`](#method.set_on_submit).
    pub fn set_on_submit_mut<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Cursive) + 'static,
    {
        let callback = std::cell::RefCell::new(callback);
        self.set_on_submit(move |s| {
            if let Ok(mut f) = callback.try_borrow_mut() {
                (*f)(s);
            }
        });
    }

    /// Sets a callback to be called when `<Enter>` is pressed.
    ///
    /// This callback can safely trigger itself recursively if needed
    /// (for instance if you call `on_event` on this view from the callback).
    ///
    /// If you need a mutable closure and don't care about the recursive
    /// aspect, see [`set_on_submit_mut`](#method.set_on_submit_mut).
    pub fn set_on_submit<F>(&mut self, callback: F)
    where
        F: Fn(&mut Cursive) + 'static,
    {
        self.on_submit = Some(Rc::new(callback));
    }

    /// Sets a mutable callback to be called when `<Enter>` is pressed.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn on_submit_mut<F>(self, callback: F) -> Self
    where
        F: FnMut(&mut Cursive) + 'static,
    {
        self.with(|v| v.set_on_submit_mut(callback))
    }

    /// Sets a callback to be called when `<Enter>` is pressed.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn on_submit<F>(self, callback: F) -> Self
    where
        F: Fn(&mut Cursive) + 'static,
    {
        self.with(|v| v.set_on_submit(callback))
    }

    /// Sets the cursor position.
    pub fn set_cursor(&mut self, cursor: usize) {
        assert!(cursor <= self.content.len());
        self.cursor = cursor;

        self.keep_cursor_in_view();
    }

    /// Insert `ch` at the current cursor position.
    ///
    /// Returns a callback in response to content change.
    ///
    /// You should run this callback with a `&mut Cursive`.
    pub fn insert(&mut self, ch: char) -> Callback {
        if !self.content.insert(self.cursor, ch) {
            // Full cell; the keystroke is dropped.
            return Callback::dummy();
        }
        self.cursor += ch.len_utf8();

        self.keep_cursor_in_view();

        self.make_edit_cb().unwrap_or_else(Callback::dummy)
    }

    /// Remove the grapheme at the current cursor position.
    ///
    /// Returns a callback in response to content change.
    ///
    /// You should run this callback with a `&mut Cursive`.
    pub fn remove(&mut self) -> Callback {
        self.content.remove_grapheme(self.cursor);

        self.keep_cursor_in_view();

        self.make_edit_cb().unwrap_or_else(Callback::dummy)
    }

    fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// The toggle control exists exactly while there is something to reveal.
    fn toggle_shown(&self) -> bool {
        !self.content.is_empty()
    }

    fn placeholder_shown(&self) -> bool {
        self.content.is_empty()
    }

    fn left_width(&self) -> usize {
        if self.left_view.is_some() {
            LEFT_VIEW_WIDTH + 1
        } else {
            0
        }
    }

    /// Width of the editable area. The toggle column is always reserved so
    /// the text does not reflow when the control appears or disappears.
    fn field_width(&self, total: usize) -> usize {
        total.saturating_sub(self.left_width() + TOGGLE_WIDTH + 1)
    }

    fn toggle_x(&self, total: usize) -> usize {
        total.saturating_sub(TOGGLE_WIDTH)
    }

    /// The content is shared, so it can shrink or change under us between
    /// events. Snap the cursor back onto a valid boundary if it did.
    fn clamp_cursor(&mut self) {
        let len = self.content.len();
        if self.cursor > len || !self.content.is_char_boundary(self.cursor) {
            self.cursor = len;
        }
        if self.offset > self.cursor || !self.content.is_char_boundary(self.offset) {
            self.offset = 0;
        }
    }

    fn make_edit_cb(&self) -> Option<Callback> {
        self.on_edit.clone().map(|cb| {
            let cursor = self.cursor;

            Callback::from_fn(move |s| {
                cb(s, cursor);
            })
        })
    }

    fn keep_cursor_in_view(&mut self) {
        // keep cursor in [offset, offset+last_length] by changing offset
        // so keep offset in [last_length-cursor,cursor]
        let content = self.content.clone();
        content.with_str(|s| {
            if self.cursor < self.offset {
                self.offset = self.cursor;
            } else {
                // So we're against the right wall.
                // Let's find how much space will be taken by the selection
                // (either a char, or _)
                let c_len = 1;

                // Now, we have to fit s[..self.cursor]
                // into self.last_length - c_len.
                let available = match self.last_length.checked_sub(c_len) {
                    Some(a) => a,
                    // Weird - no available space?
                    None => return,
                };
                // Look at the content before the cursor (we will print its tail).
                // From the end, count the length until we reach `available`.
                // Then sum the byte lengths.

                let suffix_length = simple_suffix(&s[self.offset..self.cursor], available).length;

                assert!(suffix_length <= self.cursor);
                self.offset = self.cursor - suffix_length;
                // Make sure the cursor is in view
                assert!(self.cursor >= self.offset);
            }

            // If we have too much space
            if s.len() - self.offset < self.last_length {
                assert!(self.last_length >= 1);
                let suffix_length = simple_suffix(s, self.last_length - 1).length;

                assert!(s.len() >= suffix_length);
                self.offset = s.len() - suffix_length;
            }
        });
    }

    fn draw_field(&self, printer: &Printer) {
        self.content.with_str(|content| {
            // Local clamped copies: the shared content may have changed since
            // the last layout pass.
            let cursor = if self.cursor <= content.len() && content.is_char_boundary(self.cursor) {
                self.cursor
            } else {
                content.len()
            };
            let offset = if self.offset <= cursor && content.is_char_boundary(self.offset) {
                self.offset
            } else {
                0
            };

            let width = content.graphemes(true).count();
            printer.with_style(self.style, |printer| {
                let mut effect = if self.enabled && printer.enabled {
                    Effect::Reverse
                } else {
                    Effect::Simple
                };
                if self.visible && !self.monospaced_font {
                    effect = Effect::Simple;
                }
                printer.with_effect(effect, |printer| {
                    if self.placeholder_shown() {
                        // Placeholder. Purely decorative: it consumes no
                        // events and goes away as soon as there is content.
                        let label_width = self
                            .label
                            .graphemes(true)
                            .count()
                            .min(printer.size.x);
                        printer.with_effect(Effect::Dim, |printer| {
                            printer.print((0, 0), &self.label);
                        });
                        if label_width < printer.size.x {
                            let filler_len = printer.size.x - label_width;
                            printer.print_hline((label_width, 0), filler_len, self.filler.as_str());
                        }
                    } else if width < self.last_length {
                        // No problem, everything fits.
                        assert!(printer.size.x >= width);
                        if self.visible {
                            printer.print((0, 0), content);
                        } else {
                            printer.print_hline((0, 0), width, "*");
                        }
                        let filler_len = printer.size.x - width;
                        printer.print_hline((width, 0), filler_len, self.filler.as_str());
                    } else {
                        let visible_width = content[offset..]
                            .graphemes(true)
                            .count()
                            .min(self.last_length);
                        if self.visible {
                            let prefix_length =
                                simple_prefix(&content[offset..], self.last_length).length;
                            printer.print((0, 0), &content[offset..offset + prefix_length]);
                        } else {
                            printer.print_hline((0, 0), visible_width, "*");
                        }

                        if visible_width < self.last_length {
                            let filler_len = self.last_length - visible_width;
                            printer.print_hline((visible_width, 0), filler_len, self.filler.as_str());
                        }
                    }
                });

                // Now print cursor
                if printer.focused {
                    let c: &str = if cursor == content.len() {
                        &self.filler
                    } else if self.visible {
                        content[cursor..].graphemes(true).next().unwrap_or(&self.filler)
                    } else {
                        "*"
                    };
                    let cursor_pos = content[offset..cursor].graphemes(true).count();
                    printer.print((cursor_pos, 0), c);
                }
            });
        });
    }

    fn on_mouse_press(&mut self, position: Vec2, offset: Vec2) -> EventResult {
        if self.toggle_shown() {
            let toggle_offset = offset + Vec2::new(self.toggle_x(self.last_width), 0);
            if position.fits_in_rect(toggle_offset, (TOGGLE_WIDTH, 1)) {
                // A pure display-mode switch: content, cursor and focus are
                // untouched.
                self.toggle_visible();
                return EventResult::consumed();
            }
        }

        let field_offset = offset + Vec2::new(self.left_width(), 0);
        if position.fits_in_rect(field_offset, (self.last_length, 1)) {
            if let Some(position) = position.checked_sub(field_offset) {
                let content = self.content.clone();
                content.with_str(|s| {
                    self.cursor = self.offset + simple_prefix(&s[self.offset..], position.x).length;
                });
            }
            return EventResult::consumed();
        }

        EventResult::Ignored
    }
}

impl View for TogglableSecretField {
    fn draw(&self, printer: &Printer) {
        if let Some(v) = &self.left_view {
            v.draw(&printer.cropped((LEFT_VIEW_WIDTH, 1)));
        }

        let field_printer = printer
            .offset((self.left_width(), 0))
            .cropped((self.last_length, 1));
        self.draw_field(&field_printer);

        if self.toggle_shown() {
            let label = if self.visible { HIDE_LABEL } else { SHOW_LABEL };
            printer.print((self.toggle_x(printer.size.x), 0), label);
        }
    }

    fn layout(&mut self, size: Vec2) {
        self.last_width = size.x;
        self.last_length = self.field_width(size.x);
        if let Some(v) = self.left_view.as_mut() {
            v.layout(Vec2::new(LEFT_VIEW_WIDTH, 1));
        }
        self.clamp_cursor();
    }

    fn take_focus(&mut self, _: Direction) -> Result<EventResult, CannotFocus> {
        self.enabled.then(EventResult::consumed).ok_or(CannotFocus)
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        if !self.enabled {
            return EventResult::Ignored;
        }
        self.clamp_cursor();
        match event {
            Event::Char(ch) => {
                return EventResult::Consumed(Some(self.insert(ch)));
            }
            Event::CtrlChar('r') if self.toggle_shown() => self.toggle_visible(),
            Event::Key(Key::Home) => self.set_cursor(0),
            Event::Key(Key::End) => {
                let len = self.content.len();
                self.set_cursor(len);
            }
            Event::Key(Key::Left) if self.cursor > 0 => {
                let len = self.content.grapheme_before(self.cursor).unwrap();
                let cursor = self.cursor - len;
                self.set_cursor(cursor);
            }
            Event::Key(Key::Right) if self.cursor < self.content.len() => {
                let len = self.content.grapheme_at(self.cursor).unwrap();
                let cursor = self.cursor + len;
                self.set_cursor(cursor);
            }
            Event::Key(Key::Backspace) if self.cursor > 0 => {
                let len = self.content.grapheme_before(self.cursor).unwrap();
                self.cursor -= len;
                return EventResult::Consumed(Some(self.remove()));
            }
            Event::Key(Key::Del) if self.cursor < self.content.len() => {
                return EventResult::Consumed(Some(self.remove()));
            }
            Event::Key(Key::Enter) if self.on_submit.is_some() => {
                let cb = self.on_submit.clone().unwrap();
                return EventResult::with_cb(move |s| {
                    cb(s);
                });
            }
            Event::Mouse {
                event: MouseEvent::Press(_),
                position,
                offset,
            } => {
                return self.on_mouse_press(position, offset);
            }
            _ => return EventResult::Ignored,
        }

        EventResult::Consumed(Some(Callback::dummy()))
    }

    fn important_area(&self, _: Vec2) -> Rect {
        let char_width = 1;

        let x = self.left_width() + self.cursor;

        Rect::from_size((x, 0), (char_width, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursive_core::event::MouseButton;
    use std::cell::Cell;

    const TEST_WIDTH: usize = 30;

    fn field_with(value: &str) -> (TogglableSecretField, SecretContent) {
        let content = SecretContent::new();
        assert!(content.set(value));
        let mut field = TogglableSecretField::new("Password", content.clone());
        field.layout(Vec2::new(TEST_WIDTH, 1));
        (field, content)
    }

    fn press_toggle(field: &mut TogglableSecretField) -> EventResult {
        field.on_event(Event::Mouse {
            offset: Vec2::zero(),
            position: Vec2::new(TEST_WIDTH - TOGGLE_WIDTH, 0),
            event: MouseEvent::Press(MouseButton::Left),
        })
    }

    fn type_str(field: &mut TogglableSecretField, s: &str) {
        for ch in s.chars() {
            assert!(matches!(
                field.on_event(Event::Char(ch)),
                EventResult::Consumed(_)
            ));
        }
    }

    #[test]
    fn starts_masked() {
        for value in ["", "hunter2"] {
            let (field, _) = field_with(value);
            assert!(!field.is_revealed());
        }
    }

    #[test]
    fn keyboard_toggle_flips_and_restores() {
        let (mut field, _) = field_with("hunter2");
        for round in 1..=4 {
            assert!(matches!(
                field.on_event(Event::CtrlChar('r')),
                EventResult::Consumed(_)
            ));
            assert_eq!(round % 2 == 1, field.is_revealed());
        }
    }

    #[test]
    fn mouse_toggle_is_a_pure_display_switch() {
        let (mut field, content) = field_with("hunter2");
        field.set_cursor(3);

        assert!(matches!(press_toggle(&mut field), EventResult::Consumed(_)));
        assert!(field.is_revealed());
        // Nothing but the display mode changed
        assert_eq!(3, field.cursor);
        content.with_str(|s| assert_eq!("hunter2", s));

        assert!(matches!(press_toggle(&mut field), EventResult::Consumed(_)));
        assert!(!field.is_revealed());
    }

    #[test]
    fn toggle_unavailable_while_empty() {
        let (mut field, _) = field_with("");
        assert!(!field.toggle_shown());
        assert!(matches!(
            field.on_event(Event::CtrlChar('r')),
            EventResult::Ignored
        ));
        assert!(matches!(press_toggle(&mut field), EventResult::Ignored));
        assert!(!field.is_revealed());
    }

    #[test]
    fn placeholder_shown_iff_empty() {
        let (field, _) = field_with("");
        assert!(field.placeholder_shown());
        assert!(!field.toggle_shown());

        let (field, _) = field_with("hunter2");
        assert!(!field.placeholder_shown());
        assert!(field.toggle_shown());
    }

    #[test]
    fn typing_fills_the_shared_cell() {
        let (mut field, content) = field_with("");
        type_str(&mut field, "hunter2");

        content.with_str(|s| assert_eq!("hunter2", s));
        assert_eq!(7, content.len());
        assert!(!field.is_revealed());
        assert!(field.toggle_shown());
        assert!(!field.placeholder_shown());
    }

    #[test]
    fn backspace_and_del_edit_the_shared_cell() {
        let (mut field, content) = field_with("hunter2");
        field.set_cursor(7);

        assert!(matches!(
            field.on_event(Event::Key(Key::Backspace)),
            EventResult::Consumed(_)
        ));
        content.with_str(|s| assert_eq!("hunter", s));

        field.set_cursor(0);
        assert!(matches!(
            field.on_event(Event::Key(Key::Del)),
            EventResult::Consumed(_)
        ));
        content.with_str(|s| assert_eq!("unter", s));
    }

    #[test]
    fn cursor_movement_is_grapheme_aware() {
        // "e" + combining accent is a single 3-byte grapheme
        let (mut field, _) = field_with("ae\u{301}b");
        field.set_cursor(0);

        field.on_event(Event::Key(Key::Right));
        assert_eq!(1, field.cursor);
        field.on_event(Event::Key(Key::Right));
        assert_eq!(4, field.cursor);
        field.on_event(Event::Key(Key::Left));
        assert_eq!(1, field.cursor);
        field.on_event(Event::Key(Key::End));
        assert_eq!(5, field.cursor);
        field.on_event(Event::Key(Key::Home));
        assert_eq!(0, field.cursor);
    }

    #[test]
    fn submit_fires_once_without_payload() {
        let submitted = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&submitted);

        let content = SecretContent::new();
        assert!(content.set("hunter2"));
        let mut field = TogglableSecretField::new("Password", content).on_submit(move |_| {
            counter.set(counter.get() + 1);
        });
        field.layout(Vec2::new(TEST_WIDTH, 1));

        match field.on_event(Event::Key(Key::Enter)) {
            EventResult::Consumed(Some(cb)) => {
                let mut siv = Cursive::new();
                cb(&mut siv);
            }
            _ => panic!("Enter should produce a submit callback"),
        }
        assert_eq!(1, submitted.get());
    }

    #[test]
    fn enter_ignored_without_submit_callback() {
        let (mut field, _) = field_with("hunter2");
        assert!(matches!(
            field.on_event(Event::Key(Key::Enter)),
            EventResult::Ignored
        ));
    }

    #[test]
    fn edit_callback_reports_cursor() {
        let last_cursor = Rc::new(Cell::new(usize::MAX));
        let seen = Rc::clone(&last_cursor);

        let content = SecretContent::new();
        let mut field = TogglableSecretField::new("Password", content).on_edit(move |_, cursor| {
            seen.set(cursor);
        });
        field.layout(Vec2::new(TEST_WIDTH, 1));

        match field.on_event(Event::Char('a')) {
            EventResult::Consumed(Some(cb)) => {
                let mut siv = Cursive::new();
                cb(&mut siv);
            }
            _ => panic!("typing should produce an edit callback"),
        }
        assert_eq!(1, last_cursor.get());
    }

    #[test]
    fn clearing_keeps_reveal_mode_for_the_instance() {
        let (mut field, content) = field_with("hunter2");
        field.on_event(Event::CtrlChar('r'));
        assert!(field.is_revealed());

        content.clear();
        field.layout(Vec2::new(TEST_WIDTH, 1));
        assert!(field.placeholder_shown());
        assert!(!field.toggle_shown());
        // The reveal flag lives as long as the view instance
        assert!(field.is_revealed());

        assert!(content.set("again"));
        assert!(field.toggle_shown());
        assert!(field.is_revealed());

        // A recreated view starts masked again
        let fresh = TogglableSecretField::new("Password", content);
        assert!(!fresh.is_revealed());
    }

    #[test]
    fn external_shrink_snaps_cursor_back() {
        let (mut field, content) = field_with("hunter2");
        field.set_cursor(7);

        assert!(content.set("ab"));
        field.on_event(Event::Key(Key::End));
        assert_eq!(2, field.cursor);
    }

    #[test]
    fn typing_into_a_full_cell_is_dropped() {
        let (mut field, content) = field_with(&"a".repeat(256));
        field.on_event(Event::Key(Key::End));

        assert!(matches!(
            field.on_event(Event::Char('b')),
            EventResult::Consumed(_)
        ));
        assert_eq!(256, content.len());
        content.with_str(|s| assert!(!s.contains('b')));
    }

    #[test]
    fn monospaced_font_builder_returns_reconfigured_copy() {
        let content = SecretContent::new();
        let field = TogglableSecretField::new("Password", content);
        assert!(field.monospaced_font);

        let field = field.use_monospaced_font(false);
        assert!(!field.monospaced_font);
    }

    #[test]
    fn left_view_reserves_space_only_when_present() {
        let content = SecretContent::new();
        let bare = TogglableSecretField::new("Password", content.clone());
        assert_eq!(0, bare.left_width());

        let decorated = bare.left_view(cursive_core::views::TextView::new("> "));
        assert_eq!(LEFT_VIEW_WIDTH + 1, decorated.left_width());
        assert_eq!(
            bare_width_minus_decoration(),
            decorated.field_width(TEST_WIDTH)
        );
    }

    fn bare_width_minus_decoration() -> usize {
        TEST_WIDTH - (LEFT_VIEW_WIDTH + 1) - (TOGGLE_WIDTH + 1)
    }

    #[test]
    fn disabled_field_ignores_everything() {
        let (mut field, content) = field_with("hunter2");
        field.set_enabled(false);

        assert!(matches!(
            field.on_event(Event::Char('x')),
            EventResult::Ignored
        ));
        assert!(matches!(press_toggle(&mut field), EventResult::Ignored));
        content.with_str(|s| assert_eq!("hunter2", s));
    }

    #[test]
    fn toggle_labels_share_the_reserved_width() {
        assert_eq!(TOGGLE_WIDTH, SHOW_LABEL.len());
        assert_eq!(TOGGLE_WIDTH, HIDE_LABEL.len());
    }

    mod rendering {
        use super::*;
        use cursive_core::backend::Backend as _;
        use cursive_core::theme::Theme;
        use cursive::backends::puppet::observed::ObservedScreen;

        /// Draws the field through a puppet backend and returns the observed
        /// screen.
        fn render(field: &mut TogglableSecretField, width: usize) -> ObservedScreen {
            let size = Vec2::new(width, 1);
            let mut backend = cursive::backends::puppet::Backend::init(Some(size));
            let sink = backend.stream();
            let theme = Theme::default();

            field.layout(size);
            {
                let printer = Printer::new(size, &theme, &*backend);
                field.draw(&printer);
            }
            backend.refresh();

            sink.try_iter().last().unwrap()
        }

        #[test]
        fn masked_row_has_one_star_per_grapheme() {
            // 4 chars, 3 graphemes
            let (mut field, _) = field_with("ae\u{301}b");
            let screen = render(&mut field, TEST_WIDTH);

            assert_eq!(1, screen.find_occurences("***").len());
            assert!(screen.find_occurences("****").is_empty());
            assert!(screen.find_occurences("ae").is_empty());
        }

        #[test]
        fn toggling_redraws_in_clear_text() {
            let (mut field, _) = field_with("hunter2");

            let screen = render(&mut field, TEST_WIDTH);
            assert_eq!(1, screen.find_occurences("*******").len());
            assert!(screen.find_occurences("********").is_empty());
            assert!(screen.find_occurences("hunter2").is_empty());
            assert_eq!(1, screen.find_occurences(SHOW_LABEL).len());

            field.on_event(Event::CtrlChar('r'));
            let screen = render(&mut field, TEST_WIDTH);
            assert_eq!(1, screen.find_occurences("hunter2").len());
            assert!(screen.find_occurences("*").is_empty());
            assert_eq!(1, screen.find_occurences(HIDE_LABEL).len());
        }

        #[test]
        fn empty_field_draws_placeholder_and_no_toggle() {
            let (mut field, _) = field_with("");
            let screen = render(&mut field, TEST_WIDTH);

            assert_eq!(1, screen.find_occurences("Password").len());
            assert!(screen.find_occurences(SHOW_LABEL).is_empty());
            assert!(screen.find_occurences(HIDE_LABEL).is_empty());
        }

        #[test]
        fn placeholder_disappears_once_content_is_set() {
            let (mut field, content) = field_with("");
            assert!(content.set("x"));
            let screen = render(&mut field, TEST_WIDTH);

            assert!(screen.find_occurences("Password").is_empty());
            assert_eq!(1, screen.find_occurences(SHOW_LABEL).len());
        }

        #[test]
        fn left_view_is_drawn_before_the_field() {
            let content = SecretContent::new();
            assert!(content.set("x"));
            let mut field = TogglableSecretField::new("Password", content)
                .left_view(cursive_core::views::TextView::new("@"));
            let screen = render(&mut field, TEST_WIDTH);

            assert_eq!(1, screen.find_occurences("@").len());
        }
    }
}
