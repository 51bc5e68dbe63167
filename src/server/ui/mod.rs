use cercis::prelude::*;

use crate::deploy::DeployTarget;
use crate::server::routes::homepage::Resolved;
use crate::source::Collection;

#[component]
fn PageView<'a>(resolved: &'a Resolved, target: DeployTarget) -> Element {
    let platform = target.platform_name();

    let content = match resolved {
        Resolved::NotDeployed => rsx! {
            DeployInstructions {
                target: *target,
            }
        },
        Resolved::Deployed(Ok(collections)) => rsx! {
            CollectionsView {
                collections: collections,
            }
        },
        Resolved::Deployed(Err(message)) => rsx! {
            h2 {
                class: "title is-2",
                "Collections"
            }

            ErrorNotification {
                message: message,
            }
        },
    };

    rsx! {
        div {
            class: "content",
            style: "max-width: 600px",

            h1 {
                class: "title is-1",
                "FaunaDB {platform} Integration"
            }

            content
        }
    }
}

#[component]
fn CollectionsView<'a>(collections: &'a [Collection]) -> Element {
    let has_collections = !collections.is_empty();

    rsx! {
        h2 {
            class: "title is-2",
            "Collections"
        }

        if has_collections {
            ul {
                for collection in collections.iter() {
                    li {
                        "{collection.name}"
                    }
                }
            }
        } else {
            h5 {
                class: "title is-5",
                "No Collections"
            }
        }
    }
}

#[component]
fn ErrorNotification<'a>(message: &'a str) -> Element {
    rsx! {
        p {
            class: "notification is-danger",

            "{message}"
        }
    }
}

#[component]
fn DeployInstructions(target: DeployTarget) -> Element {
    let platform = target.platform_name();

    rsx! {
        h2 {
            class: "title is-2",
            "Deploy to {platform} to verify integration"
        }

        p {
            style: "font-size: 20px",
            "The "
            code {
                "FAUNADB_SECRET"
            }
            " environment variable is not configured locally, but will be available to the application when deployed to {platform}."
        }

        h3 {
            class: "title is-3",
            "Steps to deploy"
        }

        ol {
            li {
                "Push the project to a Git repository"
            }
            li {
                "Import the repository on {platform}"
            }
            li {
                "Add the "
                code {
                    "FAUNADB_SECRET"
                }
                " environment variable in the project settings"
            }
            li {
                "Open the deployment link and wait for building to complete to verify that the application lists the collections in your database"
            }
        }
    }
}

#[component]
pub fn PageLayout<'a>(title: &'a str, children: Element<'a>) -> Element {
    rsx! {
        html {
            head {
                meta {
                    name: "viewport",
                    content: "initial-scale=1.0, width=device-width",
                }

                link {
                    rel: "stylesheet",
                    href: "https://cdn.jsdelivr.net/npm/bulma@1.0.1/css/bulma.min.css",
                }

                title {
                    "{title}"
                }
            }

            body {
                NavBar {}

                section {
                    class: "section",
                    children
                }

                footer {
                    class: "footer",
                    div {
                        class: "content has-text-centered",
                        p {
                            "faunalist"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn NavBar() -> Element {
    rsx! {
        nav {
            class: "navbar",
            role: "navigation",
            aria_label: "main navigation",

            div {
                class: "navbar-brand",

                a {
                    class: "navbar-item",
                    href: "/",
                    "faunalist"
                }
            }
        }
    }
}

pub fn render_page(resolved: &Resolved, target: DeployTarget) -> String {
    let title = format!("FaunaDB {} App", target.platform_name());

    let output = rsx! {
        PageLayout {
            title: &title,
            PageView {
                resolved: resolved,
                target: target,
            }
        }
    };

    output.render()
}
