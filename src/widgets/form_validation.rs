use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info};

use crate::config::Config;
use crate::guard::AppState;
use crate::host::{EventKind, Host, NodeId, Target};
use crate::validation::{FieldKind, FieldState, FORM_INVALID, SUBMIT_BUSY, SUBMIT_SUCCESS};
use crate::widget::{Context, Widget};
use crate::widgets::notifications::{Notifier, Severity};

pub const NAME: &str = "form-validation";

struct Field {
    kind: FieldKind,
    node: NodeId,
    feedback: NodeId,
    state: Cell<FieldState>,
}

struct ContactForm {
    host: Rc<dyn Host>,
    config: Rc<Config>,
    notifier: Notifier,
    form: NodeId,
    fields: Vec<Field>,
}

impl ContactForm {
    fn validate(&self, field: &Field) -> bool {
        let host = &self.host;
        let valid = field
            .kind
            .is_valid(&host.value(field.node), host.checked(field.node));
        if valid {
            host.remove_class(field.node, "has-error");
            host.set_style(field.node, "border-color", "");
            host.set_style(field.feedback, "display", "none");
        } else {
            host.add_class(field.node, "has-error");
            host.set_style(field.node, "border-color", "var(--color-error)");
            host.set_text(field.feedback, field.kind.message());
            host.set_style(field.feedback, "display", "block");
        }
        field.state.set(FieldState::from_valid(valid));
        valid
    }

    fn on_blur(&self, index: usize) {
        if let Some(field) = self.fields.get(index) {
            self.validate(field);
        }
    }

    fn on_input(&self, index: usize) {
        if let Some(field) = self.fields.get(index) {
            if field.state.get() == FieldState::Invalid {
                self.validate(field);
            }
        }
    }

    fn submit(&self) {
        // every field is checked so each one shows its own message
        let all_valid = self
            .fields
            .iter()
            .fold(true, |ok, field| self.validate(field) && ok);
        if !all_valid {
            self.notifier.show(FORM_INVALID, Severity::Danger);
            return;
        }

        let host = &self.host;
        let Some(button) = host
            .query_within(self.form, "button[type=\"submit\"]")
            .into_iter()
            .next()
        else {
            return;
        };

        info!("submitting contact form");
        host.set_disabled(button, true);
        let label = host.text(button);
        host.set_text(button, "");
        if let Some(spinner) = host.create_element("span") {
            host.set_attr(spinner, "class", "spinner-border spinner-border-sm me-2");
            host.append_child(button, spinner);
        }
        host.append_text(button, SUBMIT_BUSY);

        let host_after = host.clone();
        let notifier = self.notifier.clone();
        let redirect_delay = self.config.redirect_delay_ms;
        let redirect_to = self.config.redirect_to.clone();
        host.set_timeout(
            self.config.submit_delay_ms,
            Box::new(move || {
                notifier.show(SUBMIT_SUCCESS, Severity::Success);
                host_after.set_disabled(button, false);
                host_after.set_text(button, &label);

                let host_redirect = host_after.clone();
                host_after.set_timeout(
                    redirect_delay,
                    Box::new(move || host_redirect.navigate(&redirect_to)),
                );
            }),
        );
    }
}

pub struct FormValidation {
    ctx: Context,
    notifier: Notifier,
}

impl FormValidation {
    pub fn new(ctx: Context, notifier: Notifier) -> Self {
        Self { ctx, notifier }
    }

    fn discover(&self, form: NodeId) -> Vec<(FieldKind, NodeId, NodeId)> {
        let host = &self.ctx.host;
        FieldKind::ALL
            .iter()
            .filter_map(|kind| {
                let selector = format!("#{}", kind.element_id());
                let node = host.query_within(form, &selector).into_iter().next()?;
                let parent = host.parent(node)?;
                Some((*kind, node, parent))
            })
            .collect()
    }

    fn wire(&self, form: &Rc<ContactForm>) {
        let host = &self.ctx.host;
        for (index, field) in form.fields.iter().enumerate() {
            let on_blur = form.clone();
            host.listen(
                Target::Node(field.node),
                EventKind::Blur,
                Box::new(move |_| on_blur.on_blur(index)),
            );
            let on_input = form.clone();
            host.listen(
                Target::Node(field.node),
                EventKind::Input,
                Box::new(move |_| on_input.on_input(index)),
            );
        }

        let on_submit = form.clone();
        host.listen(
            Target::Node(form.form),
            EventKind::Submit,
            Box::new(move |event| {
                event.prevent_default();
                on_submit.submit();
            }),
        );
    }
}

impl Widget for FormValidation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = self.ctx.host.clone();
        let mut mounted = false;
        for form in host.query_all("form") {
            let found = self.discover(form);
            if found.is_empty() {
                debug!("form without contact fields left alone");
                continue;
            }

            let mut fields = Vec::with_capacity(found.len());
            for (kind, node, parent) in found {
                let Some(feedback) = host.create_element("div") else {
                    continue;
                };
                host.set_attr(feedback, "class", "invalid-feedback");
                host.set_style(feedback, "display", "none");
                host.append_child(parent, feedback);
                fields.push(Field {
                    kind,
                    node,
                    feedback,
                    state: Cell::new(FieldState::Untouched),
                });
            }

            let contact = Rc::new(ContactForm {
                host: host.clone(),
                config: self.ctx.config.clone(),
                notifier: self.notifier.clone(),
                form,
                fields,
            });
            self.wire(&contact);
            mounted = true;
        }
        mounted
    }
}
