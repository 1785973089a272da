use crate::views::{StudentForm, View, ViewRenderer};
use domain::{Course, Student, MAX_AGE, MIN_AGE};
use std::fmt::Write;

/// Server-side HTML pages for the student registry
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view: &View<'_>) -> String {
        match view {
            View::Home { students } => layout("Students", &home(students)),
            View::Add { form } => layout(
                "Add Student",
                &student_form("Add Student", "/students", "Create", form),
            ),
            View::Edit { id, form } => layout(
                "Edit Student",
                &student_form(
                    "Edit Student",
                    &format!("/students/{}?_method=PUT", id),
                    "Save",
                    form,
                ),
            ),
            View::See { student } => layout(&student.name, &see(student)),
        }
    }
}

/// Escape text for element content and double-quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n\
         <header><a href=\"/\">Student Registry</a></header>\n\
         <main>\n{}</main>\n\
         </body>\n\
         </html>\n",
        escape(title),
        body
    )
}

fn delete_button(student: &Student) -> String {
    format!(
        "<form class=\"inline\" action=\"/students/{}?_method=DELETE\" method=\"POST\">\
         <button type=\"submit\">Delete</button></form>",
        student.id
    )
}

fn home(students: &[Student]) -> String {
    let mut html =
        String::from("<h1>Students</h1>\n<p><a href=\"/students/new\">Add Student</a></p>\n");

    if students.is_empty() {
        html.push_str("<p class=\"empty\">No students yet.</p>\n");
        return html;
    }

    html.push_str(
        "<table>\n<thead><tr>\
         <th>Name</th><th>Age</th><th>Course</th><th>Email</th><th></th>\
         </tr></thead>\n<tbody>\n",
    );
    for student in students {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/students/{id}\">View</a> \
             <a href=\"/students/{id}/edit\">Edit</a> {}</td></tr>",
            escape(&student.name),
            student.age,
            escape(student.course.as_str()),
            escape(&student.email),
            delete_button(student),
            id = student.id,
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn see(student: &Student) -> String {
    format!(
        "<h1>{}</h1>\n\
         <dl>\n\
         <dt>Age</dt><dd>{}</dd>\n\
         <dt>Course</dt><dd>{}</dd>\n\
         <dt>Email</dt><dd>{}</dd>\n\
         <dt>Joined</dt><dd>{}</dd>\n\
         </dl>\n\
         <p><a href=\"/students/{}/edit\">Edit</a> {}</p>\n",
        escape(&student.name),
        student.age,
        escape(student.course.as_str()),
        escape(&student.email),
        student.created_at.format("%Y-%m-%d %H:%M UTC"),
        student.id,
        delete_button(student),
    )
}

fn field_errors(form: &StudentForm, field: &str) -> String {
    form.errors
        .for_field(field)
        .map(|message| format!("<span class=\"error\">{}</span>", escape(message)))
        .collect()
}

fn text_input(
    form: &StudentForm,
    field: &str,
    label: &str,
    kind: &str,
    value: Option<&str>,
) -> String {
    format!(
        "<label>{label}<input type=\"{kind}\" name=\"{field}\" value=\"{}\" required>\
         </label>{}\n",
        escape(value.unwrap_or("")),
        field_errors(form, field),
    )
}

fn course_select(form: &StudentForm) -> String {
    let selected = form.values.course.as_deref().map(str::trim);
    let mut html = String::from(
        "<label>Course<select name=\"course\" required>\n\
         <option value=\"\">Select a course</option>\n",
    );
    for course in Course::ALL {
        let marker = if selected == Some(course.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{name}\"{marker}>{name}</option>",
            name = escape(course.as_str()),
        );
    }
    html.push_str("</select></label>");
    html.push_str(&field_errors(form, "course"));
    html.push('\n');
    html
}

fn student_form(heading: &str, action: &str, submit: &str, form: &StudentForm) -> String {
    let mut html = format!("<h1>{}</h1>\n", escape(heading));

    if let Some(notice) = &form.notice {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(notice));
    }

    let _ = writeln!(html, "<form action=\"{}\" method=\"POST\">", escape(action));
    html.push_str(&text_input(
        form,
        "name",
        "Name",
        "text",
        form.values.name.as_deref(),
    ));
    html.push_str(&format!(
        "<label>Age<input type=\"number\" name=\"age\" min=\"{}\" max=\"{}\" value=\"{}\" \
         required></label>{}\n",
        MIN_AGE,
        MAX_AGE,
        escape(form.values.age.as_deref().unwrap_or("")),
        field_errors(form, "age"),
    ));
    html.push_str(&course_select(form));
    html.push_str(&text_input(
        form,
        "email",
        "Email",
        "email",
        form.values.email.as_deref(),
    ));
    let _ = writeln!(html, "<button type=\"submit\">{}</button>", escape(submit));
    html.push_str("</form>\n<p><a href=\"/\">Back to list</a></p>\n");
    html
}
