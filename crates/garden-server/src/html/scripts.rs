//! Page scripts. `HISTORY_KEY` and `POSITION_KEY` are defined by the layout.

pub fn terminal_js() -> &'static str {
    r#"
(function () {
    const term = document.getElementById('terminal');
    if (!term) return;

    const output = document.getElementById('terminal-output');
    const input = document.getElementById('terminal-input');
    const promptEl = document.getElementById('terminal-prompt');

    let cwd = '/home/guest';
    let history = loadHistory();
    let cursor = history.length;

    function loadHistory() {
        try {
            const stored = JSON.parse(localStorage.getItem(HISTORY_KEY) || '[]');
            return Array.isArray(stored) ? stored.filter((e) => typeof e === 'string') : [];
        } catch (e) {
            return [];
        }
    }

    function print(text, cls) {
        const line = document.createElement('div');
        line.className = cls ? 'terminal-line ' + cls : 'terminal-line';
        line.textContent = text;
        output.appendChild(line);
        term.scrollTop = term.scrollHeight;
    }

    print("Type 'help' to see what this shell can do.");
    term.addEventListener('click', () => input.focus());

    input.addEventListener('keydown', async (event) => {
        if (event.key === 'ArrowUp') {
            event.preventDefault();
            if (cursor > 0) {
                cursor -= 1;
                input.value = history[cursor];
            }
            return;
        }
        if (event.key === 'ArrowDown') {
            event.preventDefault();
            if (cursor < history.length - 1) {
                cursor += 1;
                input.value = history[cursor];
            } else {
                cursor = history.length;
                input.value = '';
            }
            return;
        }
        if (event.key !== 'Enter') return;

        event.preventDefault();
        const line = input.value;
        input.value = '';
        print(promptEl.textContent + ' ' + line);

        try {
            const res = await fetch('/api/terminal', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ line, cwd, history }),
            });
            if (!res.ok) throw new Error('HTTP ' + res.status);

            const result = await res.json();
            if (result.clear) output.innerHTML = '';
            result.output.forEach((l) => print(l));
            cwd = result.cwd;
            promptEl.textContent = result.prompt;
            history = result.history;
            cursor = history.length;
            localStorage.setItem(HISTORY_KEY, JSON.stringify(history));

            if (result.open) {
                setTimeout(() => { window.location.href = result.open; }, 300);
            }
        } catch (err) {
            print('terminal: connection lost (' + err.message + ')', 'error');
        }
    });
})();
"#
}

pub fn contact_js() -> &'static str {
    r#"
(function () {
    const form = document.getElementById('contact-form');
    if (!form) return;

    const status = document.getElementById('contact-status');
    const submitBtn = document.getElementById('contact-submit');
    const EMAIL = /^[^\s@]+@[^\s@]+\.[^\s@]+$/;

    function showStatus(message, type) {
        status.textContent = message;
        status.className = 'status ' + type;
    }

    // Same checks, same order, as the server
    function validate(name, email, message) {
        if (!name) return 'Please enter your name.';
        if (!email) return 'Please enter your email address.';
        if (!EMAIL.test(email)) return 'Please enter a valid email address.';
        if (!message) return 'Please enter a message.';
        if (Array.from(message).length < 10) return 'Message must be at least 10 characters long.';
        return null;
    }

    form.addEventListener('submit', async (event) => {
        event.preventDefault();

        const name = form.elements.name.value.trim();
        const email = form.elements.email.value.trim();
        const message = form.elements.message.value.trim();

        const problem = validate(name, email, message);
        if (problem) {
            showStatus(problem, 'error');
            return;
        }

        submitBtn.disabled = true;
        submitBtn.textContent = 'Sending...';

        try {
            const res = await fetch('/api/contact', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ name, email, message }),
            });
            const body = await res.json().catch(() => ({}));

            if (res.ok) {
                showStatus(body.message || 'Thanks! Your message has been sent.', 'success');
                form.reset();
            } else {
                showStatus(body.error || 'Sorry, your message could not be sent.', 'error');
            }
        } catch (err) {
            showStatus('Sorry, your message could not be sent. Please try again later.', 'error');
        } finally {
            submitBtn.disabled = false;
            submitBtn.textContent = 'Send';
        }
    });
})();
"#
}

pub fn graph_widget_js() -> &'static str {
    r#"
(function () {
    const widget = document.getElementById('corner-graph');
    if (!widget) return;

    const handle = widget.querySelector('.corner-graph-handle');
    const canvas = widget.querySelector('.corner-graph-canvas');

    function place(left, top) {
        const maxLeft = Math.max(0, window.innerWidth - widget.offsetWidth);
        const maxTop = Math.max(0, window.innerHeight - widget.offsetHeight);
        widget.style.left = Math.min(Math.max(0, left), maxLeft) + 'px';
        widget.style.top = Math.min(Math.max(0, top), maxTop) + 'px';
        widget.style.right = 'auto';
        widget.style.bottom = 'auto';
    }

    try {
        const saved = JSON.parse(localStorage.getItem(POSITION_KEY) || 'null');
        if (saved && typeof saved.left === 'number' && typeof saved.top === 'number') {
            place(saved.left, saved.top);
        }
    } catch (e) {
        localStorage.removeItem(POSITION_KEY);
    }

    let drag = null;
    handle.addEventListener('pointerdown', (event) => {
        if (event.target.closest('a')) return;
        const rect = widget.getBoundingClientRect();
        drag = { dx: event.clientX - rect.left, dy: event.clientY - rect.top };
        handle.setPointerCapture(event.pointerId);
    });
    handle.addEventListener('pointermove', (event) => {
        if (drag) place(event.clientX - drag.dx, event.clientY - drag.dy);
    });
    handle.addEventListener('pointerup', () => {
        if (!drag) return;
        drag = null;
        const rect = widget.getBoundingClientRect();
        localStorage.setItem(POSITION_KEY, JSON.stringify({ left: rect.left, top: rect.top }));
    });

    if (typeof ForceGraph === 'undefined') return;

    fetch(widget.dataset.url)
        .then((res) => (res.ok ? res.json() : Promise.reject(new Error('HTTP ' + res.status))))
        .then((data) => {
            if (!data.nodes.length) {
                widget.style.display = 'none';
                return;
            }
            ForceGraph()(canvas)
                .width(canvas.clientWidth)
                .height(canvas.clientHeight)
                .graphData(data)
                .nodeId('id')
                .nodeLabel('label')
                .nodeAutoColorBy('group')
                .nodeVal((node) => 1 + node.degree)
                .onNodeClick(openNode);
        })
        .catch(() => { widget.style.display = 'none'; });

    function openNode(node) {
        if (node.kind !== 'note') return;
        window.location.href = '/garden/' + node.id.split('/').map(encodeURIComponent).join('/');
    }
})();
"#
}

pub fn graph_page_js() -> &'static str {
    r#"
(function () {
    const container = document.getElementById('graph');
    const buttons = document.querySelectorAll('.graph-controls button');
    if (!container || typeof ForceGraph === 'undefined') return;

    const graph = ForceGraph()(container)
        .nodeId('id')
        .nodeLabel('label')
        .nodeAutoColorBy('group')
        .nodeVal((node) => (node.kind === 'folder' ? 4 : 1 + node.degree))
        .linkColor(() => 'rgba(138, 150, 163, 0.35)')
        .onNodeClick((node) => {
            if (node.kind !== 'note') return;
            window.location.href = '/garden/' + node.id.split('/').map(encodeURIComponent).join('/');
        });

    function resize() {
        graph.width(container.clientWidth).height(container.clientHeight);
    }

    function load(mode) {
        buttons.forEach((b) => b.classList.toggle('active', b.dataset.mode === mode));
        fetch('/api/graph?mode=' + mode)
            .then((res) => (res.ok ? res.json() : Promise.reject(new Error('HTTP ' + res.status))))
            .then((data) => graph.graphData(data))
            .catch((err) => {
                container.textContent = 'Could not load the graph: ' + err.message;
            });
    }

    buttons.forEach((b) => b.addEventListener('click', () => load(b.dataset.mode)));
    window.addEventListener('resize', resize);
    resize();
    load('links');
})();
"#
}
